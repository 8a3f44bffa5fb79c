use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use ragchat::core::config::{self, RagChatConfig};
use ragchat::core::session::{FileSessionStore, MemorySessionStore, SessionStore, storage_path};
use ragchat::tui;

#[derive(Parser)]
#[command(name = "ragchat", about = "Terminal chat client for a RAG assistant")]
struct Args {
    /// RAG server base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Directory exported conversations are written to
    #[arg(long)]
    export_dir: Option<String>,

    /// Keep the session id in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Log at info level instead of debug
    #[arg(long)]
    quiet_log: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ragchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.quiet_log {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };
    if let Ok(log_file) = File::create("ragchat.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Falling back to default config: {}", e);
        RagChatConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        args.base_url.as_deref(),
        args.export_dir.as_deref(),
    );

    let store: Box<dyn SessionStore> = match (args.ephemeral, storage_path()) {
        (false, Some(path)) => Box::new(FileSessionStore::new(path)),
        (false, None) => {
            warn!("No home directory, session id will not survive restarts");
            Box::new(MemorySessionStore::default())
        }
        (true, _) => Box::new(MemorySessionStore::default()),
    };

    info!(
        "ragchat starting: server={}, export_dir={}",
        resolved.base_url,
        resolved.export_dir.display()
    );

    tui::run(resolved, store)
}
