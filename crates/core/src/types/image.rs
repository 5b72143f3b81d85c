//! Recipe image URL normalization.
//!
//! Images live in a single S3 bucket. Older records store bucket-only URLs
//! (`https://<bucket>.s3.amazonaws.com/<path>`), which no longer resolve for
//! buckets outside `us-east-1`; they are rewritten to the region-qualified
//! form before reaching a view.

use std::sync::LazyLock;

use regex::Regex;

/// Bucket holding recipe images and narration audio.
pub const S3_BUCKET: &str = "smart-recipe-generator";

/// Region the bucket lives in.
pub const S3_REGION: &str = "us-east-2";

/// Image shown when a recipe has no image at all.
pub const FALLBACK_IMAGE: &str = "/logo.svg";

static LEGACY_S3_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.s3\.amazonaws\.com/(.+)$").expect("Invalid regex"));

/// Rewrite a stored image URL into its canonical form.
///
/// - Empty (or whitespace-only) input yields [`FALLBACK_IMAGE`].
/// - URLs outside the bucket are returned trimmed.
/// - Region-qualified bucket URLs are returned trimmed.
/// - Legacy bucket-only URLs are rewritten with [`S3_REGION`].
#[must_use]
pub fn normalize_s3_image_url(image_link: &str) -> String {
    let trimmed = image_link.trim();
    if trimmed.is_empty() {
        return FALLBACK_IMAGE.to_string();
    }

    if !trimmed.contains(&format!("{S3_BUCKET}.s3")) {
        return trimmed.to_string();
    }

    if trimmed.contains(&format!(".s3.{S3_REGION}.amazonaws.com")) {
        return trimmed.to_string();
    }

    if let Some(path) = LEGACY_S3_PATH
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
    {
        return format!(
            "https://{S3_BUCKET}.s3.{S3_REGION}.amazonaws.com/{}",
            path.as_str().trim()
        );
    }

    trimmed.to_string()
}

/// Whether a URL points into the recipe bucket (legacy or regional form).
#[must_use]
pub fn is_bucket_url(url: &str) -> bool {
    let normalized = normalize_s3_image_url(url);
    normalized.starts_with(&format!("https://{S3_BUCKET}.s3.{S3_REGION}.amazonaws.com/"))
}
