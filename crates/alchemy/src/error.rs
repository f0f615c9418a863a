// ABOUTME: Error types for the page converter including the ErrorCode enum and ConvertError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The input could not be parsed into a document.
    Parse,
    /// A type-specific extraction step failed.
    Extract,
    /// User-facing failure raised at the conversion boundary.
    ConversionFailed,
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
    Read,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Parse => "parse error",
            ErrorCode::Extract => "extraction error",
            ErrorCode::ConversionFailed => "conversion failed",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::Read => "read error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for conversion, fetch and read operations.
///
/// `op` names the failing operation ("Fetch", "Read", "Convert Elementor page")
/// and `target` the URL or path involved, empty for in-memory conversions.
#[derive(Debug, thiserror::Error)]
pub struct ConvertError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == ErrorCode::ConversionFailed {
            let mut chars = self.op.chars();
            return match chars.next() {
                Some(first) => write!(f, "Failed to {}{}", first.to_lowercase(), chars.as_str()),
                None => write!(f, "Failed to convert page"),
            };
        }
        write!(f, "alchemy: {}", self.op)?;
        if !self.target.is_empty() {
            write!(f, " {}", self.target)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ConvertError {
    fn new(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Parse, "", op, source)
    }

    /// Create an Extract error.
    pub fn extract(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Extract, "", op, source)
    }

    /// Wrap an internal failure into the user-facing ConversionFailed error.
    ///
    /// `op` reads as a verb phrase ("Convert GHL page"); Display renders it as
    /// "Failed to convert GHL page". The inner error stays reachable as source.
    pub fn conversion_failed(op: impl Into<String>, inner: ConvertError) -> Self {
        Self::new(
            ErrorCode::ConversionFailed,
            "",
            op,
            Some(anyhow::Error::new(inner)),
        )
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a Read error.
    pub fn read(
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Read, path, op, source)
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }

    /// Returns true if this is the user-facing ConversionFailed error.
    pub fn is_conversion_failed(&self) -> bool {
        self.code == ErrorCode::ConversionFailed
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Read error.
    pub fn is_read(&self) -> bool {
        self.code == ErrorCode::Read
    }

    /// Returns the code of the innermost wrapped ConvertError, or this one's.
    pub fn root_code(&self) -> ErrorCode {
        self.source
            .as_ref()
            .and_then(|src| src.downcast_ref::<ConvertError>())
            .map(|inner| inner.root_code())
            .unwrap_or(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_failed_displays_generic_message() {
        let inner = ConvertError::extract("select sections", Some(anyhow::anyhow!("bad selector")));
        let err = ConvertError::conversion_failed("Convert Elementor page", inner);
        assert_eq!(err.to_string(), "Failed to convert Elementor page");
        assert!(err.is_conversion_failed());
        assert_eq!(err.root_code(), ErrorCode::Extract);
    }

    #[test]
    fn fetch_error_includes_target_and_source() {
        let err = ConvertError::fetch(
            "https://example.com",
            "Fetch",
            Some(anyhow::anyhow!("HTTP status 404")),
        );
        assert_eq!(
            err.to_string(),
            "alchemy: Fetch https://example.com: fetch error: HTTP status 404"
        );
        assert!(err.is_fetch());
        assert!(!err.is_timeout());
    }

    #[test]
    fn parse_error_without_target() {
        let err = ConvertError::parse("Parse", None);
        assert_eq!(err.to_string(), "alchemy: Parse: parse error");
        assert!(err.is_parse());
    }
}
