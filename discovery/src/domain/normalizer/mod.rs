//! Pure transformation of provider records into [`crate::domain::Sale`].
//!
//! Nothing here performs I/O. Callers pass the current instant so that
//! listing windows and open-status checks are reproducible.

mod classify;
mod convert;
mod describe;

pub use classify::{CLASSIFICATION_RULES, ClassificationRule, DEFAULT_CATEGORY, ListingText, classify};
pub use convert::{
    PROVIDER_IMAGE_LIMIT, THUMBNAIL_MAX_HEIGHT, THUMBNAIL_MAX_WIDTH, ThumbnailLinker, convert,
};
pub use describe::{HOURS_VARY, OpenCheckUnavailable, describe, is_open_at, open_status};
