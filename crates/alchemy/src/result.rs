// ABOUTME: NormalizedDocument, the standalone HTML page produced by one conversion.
// ABOUTME: Carries the page type and resolved title, and knows its download name and MIME type.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::PageType;

/// File name offered when the converted page is saved.
pub const DOWNLOAD_FILE_NAME: &str = "converted-page.html";

/// MIME type of the converted page.
pub const MIME_TYPE: &str = "text/html";

/// The result of converting a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub page_type: PageType,
    pub title: String,
    pub html: String,
}

impl NormalizedDocument {
    /// The complete HTML text.
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    pub fn file_name(&self) -> &'static str {
        DOWNLOAD_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Writes the HTML to `path`, or to `converted-page.html` inside it when
    /// `path` is a directory.
    pub fn save(&self, path: &Path) -> std::io::Result<std::path::PathBuf> {
        let target = if path.is_dir() {
            path.join(DOWNLOAD_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        std::fs::write(&target, &self.html)?;
        Ok(target)
    }
}

impl AsRef<str> for NormalizedDocument {
    fn as_ref(&self) -> &str {
        &self.html
    }
}
