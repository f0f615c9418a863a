// ABOUTME: Main library entry point for the Page Alchemy HTML normalizer.
// ABOUTME: Re-exports the public API: Converter, PageType, ConvertError, profiles, Fetcher and the file reader.

//! Page Alchemy - turns page-builder HTML into a clean standalone document.
//!
//! Elementor and GoHighLevel exports are detected by signature, their
//! content sections are extracted, active content is sanitized away, and the
//! result is wrapped in a minimal responsive page.
//!
//! # Example
//!
//! ```
//! use page_alchemy::{Converter, PageType};
//!
//! let converter = Converter::default();
//! let doc = converter
//!     .convert(r#"<div class="elementor-section" data-elementor-id="5">Hi</div>"#)
//!     .unwrap();
//! assert_eq!(doc.page_type, PageType::Elementor);
//! assert!(doc.html.contains("Hi"));
//! assert!(!doc.html.contains("data-elementor-id"));
//! ```

pub mod converter;
pub mod detect;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod formats;
pub mod options;
pub mod profile;
pub mod resource;
pub mod result;
pub mod status;

pub use crate::converter::{convert, detect, Converter};
pub use crate::detect::{detect_page_type, PageType};
pub use crate::error::{ConvertError, ErrorCode};
pub use crate::formats::sanitize_html;
pub use crate::options::{ConverterBuilder, FetchOptions, FetcherBuilder, Options};
pub use crate::profile::{ExtractionStrategy, PageProfile, ProfileSet};
pub use crate::resource::{
    decode_html_bytes, read_html_file, Endpoint, Fetcher, MAX_CONTENT_LENGTH,
};
pub use crate::result::{NormalizedDocument, DOWNLOAD_FILE_NAME, MIME_TYPE};
pub use crate::status::ConversionStatus;
