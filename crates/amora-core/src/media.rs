use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

/// Largest image accepted for a chat attachment, in decoded bytes (1.5 MiB).
pub const MAX_IMAGE_SIZE_BYTES: usize = 3 * 1024 * 1024 / 2;

/// Largest photo accepted for a feed post.
pub const MAX_POST_IMAGE_SIZE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("not a base64 data URL")]
    Malformed,

    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("invalid base64 payload: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// An image checked against the upload rules. The data URL itself is kept
/// verbatim and forwarded to the backend as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime: String,
    pub size: usize,
    data_url: String,
}

impl ImageAttachment {
    /// Validate a chat attachment.
    pub fn from_data_url(data_url: &str) -> Result<Self, MediaError> {
        Self::with_limit(data_url, MAX_IMAGE_SIZE_BYTES)
    }

    pub fn with_limit(data_url: &str, limit: usize) -> Result<Self, MediaError> {
        let rest = data_url.strip_prefix("data:").ok_or(MediaError::Malformed)?;
        let (header, payload) = rest.split_once(',').ok_or(MediaError::Malformed)?;
        let mime = header.strip_suffix(";base64").ok_or(MediaError::Malformed)?;

        if !mime.starts_with("image/") {
            return Err(MediaError::UnsupportedType(mime.to_string()));
        }

        // Cheap upper bound before decoding anything large.
        let estimated = payload.len() / 4 * 3;
        if estimated > limit + 3 {
            return Err(MediaError::TooLarge {
                size: estimated,
                limit,
            });
        }

        let size = B64.decode(payload)?.len();
        if size > limit {
            return Err(MediaError::TooLarge { size, limit });
        }

        Ok(Self {
            mime: mime.to_string(),
            size,
            data_url: data_url.to_string(),
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_url(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, B64.encode(bytes))
    }

    #[test]
    fn accepts_small_image() {
        let url = data_url("image/png", &[0x89, b'P', b'N', b'G']);
        let img = ImageAttachment::from_data_url(&url).unwrap();
        assert_eq!(img.mime, "image/png");
        assert_eq!(img.size, 4);
        assert_eq!(img.data_url(), url);
    }

    #[test]
    fn limit_is_inclusive() {
        let url = data_url("image/jpeg", &vec![0u8; MAX_IMAGE_SIZE_BYTES]);
        assert!(ImageAttachment::from_data_url(&url).is_ok());

        let url = data_url("image/jpeg", &vec![0u8; MAX_IMAGE_SIZE_BYTES + 1]);
        assert!(matches!(
            ImageAttachment::from_data_url(&url),
            Err(MediaError::TooLarge { .. })
        ));
    }

    #[test]
    fn post_photos_allow_more() {
        let url = data_url("image/webp", &vec![7u8; MAX_IMAGE_SIZE_BYTES * 2]);
        assert!(ImageAttachment::from_data_url(&url).is_err());
        let img = ImageAttachment::with_limit(&url, MAX_POST_IMAGE_SIZE_BYTES).unwrap();
        assert_eq!(img.size, MAX_IMAGE_SIZE_BYTES * 2);
    }

    #[test]
    fn rejects_non_images_and_garbage() {
        let url = data_url("text/plain", b"hello");
        assert!(matches!(
            ImageAttachment::from_data_url(&url),
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            ImageAttachment::from_data_url("https://example.com/cat.png"),
            Err(MediaError::Malformed)
        ));
        assert!(matches!(
            ImageAttachment::from_data_url("data:image/png,rawbytes"),
            Err(MediaError::Malformed)
        ));
        assert!(matches!(
            ImageAttachment::from_data_url("data:image/png;base64,***"),
            Err(MediaError::Encoding(_))
        ));
    }
}
