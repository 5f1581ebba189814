//! References to image assets held by works.
//!
//! A reference is either an absolute external URL, which the store never
//! touches, or `/uploads/<file name>` pointing at a file the store wrote
//! into its uploads directory.

use crate::CoreError;
use uuid::Uuid;

pub mod memory;

pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Outcome of removing a local asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    /// Nothing at the resolved location; treated as already cleaned up.
    Missing,
    /// The reference does not resolve to a local file.
    Skipped,
}

/// Storage for uploaded images, addressed by reference.
pub trait AssetStore: Send + Sync {
    /// Stores `bytes` under a fresh opaque name and returns its reference.
    fn store(&self, bytes: &[u8], original_filename: &str) -> Result<String, CoreError>;

    /// Deletes the asset `reference` points at, if it is local.
    fn remove(&self, reference: &str) -> Result<Removal, CoreError>;
}

/// Any reference carrying a URL scheme (`https:`, `ftp:`, `data:`, ...) or
/// starting with `//` points outside the uploads directory.
pub fn is_external(reference: &str) -> bool {
    let r = reference.trim();
    r.starts_with("//") || has_scheme(r)
}

fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Final path component of a local reference. External references and
/// components that could escape the uploads directory yield `None`.
pub fn local_file_name(reference: &str) -> Option<&str> {
    if is_external(reference) {
        return None;
    }
    let name = reference
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        n => Some(n),
    }
}

/// Random file name keeping the original's extension when it is plain
/// alphanumeric ASCII.
pub fn opaque_file_name(original_filename: &str) -> String {
    let token = Uuid::new_v4();
    match extension(original_filename) {
        Some(ext) => format!("{token}.{ext}"),
        None => token.to_string(),
    }
}

pub fn upload_reference(file_name: &str) -> String {
    format!("{UPLOADS_PREFIX}{file_name}")
}

fn extension(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
