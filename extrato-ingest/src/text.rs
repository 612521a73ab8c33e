//! Text extraction front end.
//!
//! The parser only ever sees one text buffer: every page followed by a
//! newline, in page order.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::IngestError;

/// Anything that can turn a statement file into per-page text.
pub trait TextSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, IngestError>;
}

/// Default source: PDFs through `pdf_extract`, anything else read as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl TextSource for FileTextSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, IngestError> {
        if !path.exists() {
            return Err(IngestError::NotFound(path.to_path_buf()));
        }

        if is_pdf(path) {
            let bytes = fs::read(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| IngestError::Pdf {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            // pdf-extract separates pages with form feeds when it emits them
            let pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
            debug!(path = %path.display(), pages = pages.len(), "extracted pdf text");
            Ok(pages)
        } else {
            let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(vec![text])
        }
    }
}

/// Concatenated statement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementText(String);

impl StatementText {
    pub fn concat<S: AsRef<str>>(pages: &[S]) -> Self {
        let mut buf = String::new();
        for page in pages {
            let page = page.as_ref();
            if page.is_empty() {
                continue;
            }
            buf.push_str(page);
            buf.push('\n');
        }
        Self(buf)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// List PDF statements in a directory, sorted by file name.
pub fn discover_statements(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.exists() {
        return Err(IngestError::NotFound(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_pdf(&path) {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_appends_newline_per_page() {
        let text = StatementText::concat(&["page one", "", "page two"]);
        assert_eq!(text.as_str(), "page one\npage two\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = FileTextSource
            .extract_pages(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_plain_text_is_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.txt");
        fs::write(&path, "15/03/24 PADARIA 12,00-\n").unwrap();
        let pages = FileTextSource.extract_pages(&path).unwrap();
        assert_eq!(pages, vec!["15/03/24 PADARIA 12,00-\n".to_string()]);
    }

    #[test]
    fn test_discover_only_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PDF", "a.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let found = discover_statements(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }
}
