//! Conversation export: naming and writing the downloaded JSON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::core::session::atomic_write;

/// `chat_<ISO timestamp to the second>.json`, with colons replaced by dashes
/// since they are not valid in file names everywhere.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H:%M:%S").to_string().replace(':', "-");
    format!("chat_{stamp}.json")
}

/// Write an export into `dir`, creating it if needed. Returns the final path.
pub fn save_export(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    atomic_write(&path, contents)?;
    info!("Exported conversation to {}", path.display());
    Ok(path)
}
