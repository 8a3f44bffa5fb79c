//! # Pending Files
//!
//! The two upload buffers (knowledge-base and temporary) and the parsing of
//! dropped file paths. A terminal receives a drag-and-drop as pasted text,
//! so "dropping" files means parsing that text into paths.
//!
//! Nothing here validates type or size: the server rejects what it can't index.

use std::fs;
use std::path::PathBuf;

use log::warn;
use reqwest::Url;

/// Which buffer a file intake zone feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeTarget {
    /// Files to be permanently indexed by the server.
    KnowledgeBase,
    /// Files attached to the next query only.
    Temporary,
}

impl IntakeTarget {
    pub fn label(&self) -> &'static str {
        match self {
            IntakeTarget::KnowledgeBase => "Knowledge base",
            IntakeTarget::Temporary => "Attachments",
        }
    }
}

/// A file chosen by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    /// Size in bytes, if the file could be stat'ed when it was picked.
    pub size: Option<u64>,
}

impl PendingFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = fs::metadata(&path).ok().map(|m| m.len());
        Self { path, name, size }
    }
}

/// A pending upload buffer. Selections replace the contents wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileBuffer {
    files: Vec<PendingFile>,
}

impl FileBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, files: Vec<PendingFile>) {
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Removes the file at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parse pasted text from a terminal drag-and-drop (or a typed path list)
/// into individual paths.
///
/// Handles whitespace/newline separation, single and double quotes,
/// backslash-escaped characters and `file://` URIs. URIs naming another
/// host are skipped.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                c if c.is_whitespace() => flush_path(&mut current, &mut paths),
                c => current.push(c),
            },
        }
    }
    flush_path(&mut current, &mut paths);

    paths
}

fn flush_path(current: &mut String, paths: &mut Vec<PathBuf>) {
    if current.is_empty() {
        return;
    }
    let token = std::mem::take(current);
    if !token.starts_with("file://") {
        paths.push(PathBuf::from(token));
        return;
    }
    match Url::parse(&token).ok().and_then(|url| url.to_file_path().ok()) {
        Some(path) => paths.push(path),
        None => warn!("Ignoring dropped URI that is not a local file: {}", token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size: None,
        }
    }

    #[test]
    fn test_replace_does_not_merge() {
        let mut buffer = FileBuffer::new();
        buffer.replace(vec![file("a.pdf"), file("b.pdf")]);
        buffer.replace(vec![file("c.txt")]);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.files()[0].name, "c.txt");
    }

    #[test]
    fn test_remove_by_index() {
        let mut buffer = FileBuffer::new();
        buffer.replace(vec![file("a"), file("b"), file("c")]);
        let removed = buffer.remove(1);
        assert_eq!(removed.map(|f| f.name), Some("b".to_string()));
        let names: Vec<&str> = buffer.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(buffer.remove(5).is_none());
    }

    #[test]
    fn test_parse_plain_and_newline_separated() {
        let paths = parse_dropped_paths("/a/one.txt /b/two.pdf\n/c/three.md\n");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/one.txt"),
                PathBuf::from("/b/two.pdf"),
                PathBuf::from("/c/three.md"),
            ]
        );
    }

    #[test]
    fn test_parse_quoted_and_escaped() {
        let paths = parse_dropped_paths(r#"'/my docs/report.pdf' "/x y/z.txt" /esc\ aped.log"#);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/my docs/report.pdf"),
                PathBuf::from("/x y/z.txt"),
                PathBuf::from("/esc aped.log"),
            ]
        );
    }

    #[test]
    fn test_parse_file_uri() {
        let paths = parse_dropped_paths("file:///home/me/My%20File.txt");
        assert_eq!(paths, vec![PathBuf::from("/home/me/My File.txt")]);
    }

    #[test]
    fn test_parse_file_uri_with_localhost_authority() {
        let paths = parse_dropped_paths("file://localhost/tmp/a%20b.txt\nfile:///tmp/c.md");
        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/a b.txt"), PathBuf::from("/tmp/c.md")]
        );
    }

    #[test]
    fn test_parse_remote_file_uri_is_skipped() {
        let paths = parse_dropped_paths("file://fileserver/share/x.pdf /tmp/y.pdf");
        assert_eq!(paths, vec![PathBuf::from("/tmp/y.pdf")]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_dropped_paths("   \n ").is_empty());
        assert!(parse_dropped_paths("''").is_empty());
    }

    #[test]
    fn test_pending_file_from_missing_path() {
        let pending = PendingFile::from_path("/definitely/not/here/notes.md");
        assert_eq!(pending.name, "notes.md");
        assert_eq!(pending.size, None);
    }
}
