use crate::model::{DownloadMode, DownloadRequest, ValidationError};

/// Checks the raw form fields and builds a `DownloadRequest`, or reports the
/// first failing check. The emptiness check runs before the scheme check.
pub fn build_request(
    url: &str,
    mode: DownloadMode,
    destination: &str,
) -> Result<DownloadRequest, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingInput);
    }
    // Case-sensitive prefix check, same as the ^https?:// shape the tool expects
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidUrl);
    }
    if destination.is_empty() {
        return Err(ValidationError::MissingDestination);
    }
    // The destination is not checked for existence; yt-dlp creates or fails on it
    Ok(DownloadRequest {
        url: url.to_string(),
        mode,
        destination: destination.to_string(),
    })
}
