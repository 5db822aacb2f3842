use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Failure parsing a `data:` URI into a [`DataUrl`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotADataUrl,

    #[error("data URL has no base64 payload")]
    MissingPayload,

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

/// A parsed `data:<mime>;base64,<payload>` image reference.
///
/// Only `image/*` media types are accepted; the payload is carried opaque,
/// exactly as received, and re-encoded verbatim by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    data: String,
}

impl DataUrl {
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload, without the `data:` prelude
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("data:").ok_or(DataUrlError::NotADataUrl)?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or(DataUrlError::MissingPayload)?;
        if data.is_empty() {
            return Err(DataUrlError::MissingPayload);
        }
        if !mime_type.starts_with("image/") {
            return Err(DataUrlError::UnsupportedMediaType(mime_type.to_string()));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png() {
        let url: DataUrl = "data:image/png;base64,iVBORw0KGgo=".parse().unwrap();
        assert_eq!(url.mime_type(), "image/png");
        assert_eq!(url.data(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_display_roundtrip() {
        let raw = "data:image/jpeg;base64,/9j/4AAQ";
        let url: DataUrl = raw.parse().unwrap();
        assert_eq!(url.to_string(), raw);
    }

    #[test]
    fn test_rejects_plain_string() {
        let err = "hello".parse::<DataUrl>().unwrap_err();
        assert_eq!(err, DataUrlError::NotADataUrl);
    }

    #[test]
    fn test_rejects_missing_payload() {
        let err = "data:image/png;base64,".parse::<DataUrl>().unwrap_err();
        assert_eq!(err, DataUrlError::MissingPayload);
    }

    #[test]
    fn test_rejects_non_image() {
        let err = "data:text/plain;base64,aGVsbG8=".parse::<DataUrl>().unwrap_err();
        assert_eq!(
            err,
            DataUrlError::UnsupportedMediaType("text/plain".to_string())
        );
    }
}
