//! Upload filename handling: eligibility checks and sanitization.
//!
//! The claimed filename of an upload is untrusted input. Two things happen to
//! it before it reaches the filesystem:
//!
//! 1. [`allowed_file`] gates eligibility on the extension alone. The declared
//!    content-type is never consulted.
//! 2. [`secure_filename`] turns it into a single safe path segment that is
//!    also a valid relative URL segment with nothing left to escape.
//!
//! ## Sanitization rules
//!
//! - Directory components are dropped: `../../etc/passwd.png` → `passwd.png`
//! - Accents are decomposed (NFKD) and whatever is still non-ASCII is
//!   dropped: `café.jpg` → `cafe.jpg`
//! - Whitespace runs collapse to `_`: `my team photo.jpg` → `my_team_photo.jpg`
//! - Only `[A-Za-z0-9_.-]` survive; leading and trailing `.`/`_` are stripped
//! - Windows device names get a `_` prefix: `con.png` → `_con.png`
//!
//! When sanitization eats the name down to something that no longer carries
//! an allowed extension (`日本.png` → `png`), [`storage_name`] falls back to
//! `image.<ext>`.

use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for upload, compared lower-cased.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Hex digits of the content hash appended under the `content-hash` naming policy.
const HASH_SUFFIX_LEN: usize = 12;

/// Lower-cased substring after the last `.`, if there is a `.` at all.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether a filename is eligible for ingestion.
///
/// True only when the name contains a `.` and the text after the last `.`,
/// lower-cased, is one of [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce an arbitrary filename to a safe, flat path segment.
///
/// May return an empty string when nothing safe is left.
pub fn secure_filename(filename: &str) -> String {
    // Compatibility decomposition splits accents off their base letters, so
    // `café` keeps its `e`. It also folds fullwidth slashes into real ones
    // before directory components are dropped.
    let decomposed: String = filename.nfkd().collect();
    let base = decomposed.rsplit(['/', '\\']).next().unwrap_or(&decomposed);

    let ascii: String = base.chars().filter(char::is_ascii).collect();
    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    let device = trimmed.split('.').next().unwrap_or("").to_ascii_uppercase();
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.contains(&device.as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Final on-disk name for an upload that already passed [`allowed_file`].
///
/// Returns `None` only when the original name itself is not allowed.
pub fn storage_name(original: &str) -> Option<String> {
    let sanitized = secure_filename(original);
    if allowed_file(&sanitized) {
        return Some(sanitized);
    }
    let ext = extension_of(original).filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))?;
    Some(format!("image.{ext}"))
}

/// Insert a short content hash before the extension: `team.jpg` → `team-1a2b3c4d5e6f.jpg`.
pub fn content_hashed_name(name: &str, data: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(data));
    let suffix = &digest[..HASH_SUFFIX_LEN];
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{suffix}.{ext}"),
        None => format!("{name}-{suffix}"),
    }
}
