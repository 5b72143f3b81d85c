//! Audio preloading for recipe narration.
//!
//! A clip is either fully fetched or fails within [`PRELOAD_TIMEOUT`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Longest a preload may take before giving up.
pub const PRELOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Largest clip that will be buffered.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Content type assumed when the asset host does not send one.
pub const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// Why an audio clip could not be preloaded.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The asset could not be fetched.
    #[error("Error loading audio")]
    Load { reason: String },

    /// The asset did not finish loading in time.
    #[error("Audio loading timeout")]
    Timeout,
}

/// A fully loaded audio clip.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub url: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Preload an audio clip with the default timeout.
///
/// # Errors
///
/// Returns `MediaError::Load` if the fetch fails and `MediaError::Timeout`
/// if it takes longer than [`PRELOAD_TIMEOUT`].
pub async fn preload_audio(client: &reqwest::Client, url: &str) -> Result<AudioClip, MediaError> {
    preload_audio_with_timeout(client, url, PRELOAD_TIMEOUT).await
}

/// Preload an audio clip, failing after `limit`.
///
/// # Errors
///
/// Returns `MediaError::Load` if the fetch fails and `MediaError::Timeout`
/// if it takes longer than `limit`.
pub async fn preload_audio_with_timeout(
    client: &reqwest::Client,
    url: &str,
    limit: Duration,
) -> Result<AudioClip, MediaError> {
    preload_audio_with_limits(client, url, limit, MAX_AUDIO_BYTES).await
}

/// Preload an audio clip, failing after `limit` or once it exceeds
/// `max_bytes`.
///
/// # Errors
///
/// Returns `MediaError::Load` if the fetch fails or the clip is too large,
/// and `MediaError::Timeout` if it takes longer than `limit`.
pub async fn preload_audio_with_limits(
    client: &reqwest::Client,
    url: &str,
    limit: Duration,
    max_bytes: usize,
) -> Result<AudioClip, MediaError> {
    let result = tokio::time::timeout(limit, fetch(client, url, max_bytes)).await;

    match result {
        Ok(Ok(clip)) => Ok(clip),
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = ?e, "Audio preload failed");
            Err(e)
        }
        Err(_) => {
            tracing::warn!(url = %url, timeout_secs = limit.as_secs(), "Audio preload timed out");
            Err(MediaError::Timeout)
        }
    }
}

async fn fetch(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<AudioClip, MediaError> {
    let load_error = |e: reqwest::Error| MediaError::Load {
        reason: e.to_string(),
    };
    let too_large = || MediaError::Load {
        reason: format!("clip larger than {max_bytes} bytes"),
    };

    let mut response = client.get(url).send().await.map_err(load_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::Load {
            reason: format!("status {status}"),
        });
    }

    let declared = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok());
    if declared.is_some_and(|len| len > max_bytes) {
        return Err(too_large());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_TYPE)
        .to_string();

    // Content-Length may be absent or wrong, so the cap also applies while reading
    let mut bytes = Vec::with_capacity(declared.unwrap_or_default());
    while let Some(chunk) = response.chunk().await.map_err(load_error)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(AudioClip {
        url: url.to_string(),
        content_type,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MediaError::Load {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Error loading audio");
        assert_eq!(MediaError::Timeout.to_string(), "Audio loading timeout");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_load_error() {
        let client = reqwest::Client::new();
        let result = preload_audio(&client, "http://127.0.0.1:1/clip.mp3").await;
        assert!(matches!(result, Err(MediaError::Load { .. })));
    }
}
