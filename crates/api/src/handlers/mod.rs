//! HTTP handlers, one module per resource.

pub mod analytics;
pub mod generation;
pub mod images;
pub mod themes;

use textures_core::ratings::HistoryRecord;
use textures_db::models::image::Image;

/// Convert stored image rows into the record shape the analyzers consume.
pub(crate) fn to_history(images: &[Image]) -> Vec<HistoryRecord> {
    images
        .iter()
        .map(|image| HistoryRecord {
            prompt: image.prompt.clone(),
            keywords: image.keywords.clone(),
            rating: image.rating,
            created_at: Some(image.created_at.to_rfc3339()),
        })
        .collect()
}
