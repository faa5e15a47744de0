//! Validation helpers for caller-supplied generation and rating parameters.
//!
//! These run at the orchestration boundary, before any core analysis or
//! generation function is invoked.

use crate::error::CoreError;
use crate::policy::{
    MAX_RATING, MAX_VARIATIONS, MIN_RATING, MIN_VARIATIONS, VALID_IMAGE_SIZES, VALID_QUALITIES,
};

/// Validate that a rating is within the allowed star range.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}

/// Validate the requested number of prompt variations.
pub fn validate_num_variations(num_variations: u32) -> Result<(), CoreError> {
    if (MIN_VARIATIONS..=MAX_VARIATIONS).contains(&num_variations) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Number of variations must be between {MIN_VARIATIONS} and {MAX_VARIATIONS}"
        )))
    }
}

/// Validate that an image size is one the image API accepts.
pub fn validate_image_size(size: &str) -> Result<(), CoreError> {
    if VALID_IMAGE_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image size '{size}'. Must be one of: {}",
            VALID_IMAGE_SIZES.join(", ")
        )))
    }
}

/// Validate that a quality setting is one the image API accepts.
pub fn validate_quality(quality: &str) -> Result<(), CoreError> {
    if VALID_QUALITIES.contains(&quality) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid quality '{quality}'. Must be one of: {}",
            VALID_QUALITIES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_accepted() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
    }

    #[test]
    fn rating_out_of_range_rejected() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn variation_count_bounds() {
        assert!(validate_num_variations(1).is_ok());
        assert!(validate_num_variations(6).is_ok());
        assert!(validate_num_variations(0).is_err());
        assert!(validate_num_variations(7).is_err());
    }

    #[test]
    fn image_size_known_values() {
        assert!(validate_image_size("1024x1024").is_ok());
        assert!(validate_image_size("1792x1024").is_ok());
        assert!(validate_image_size("512x512").is_err());
    }

    #[test]
    fn quality_known_values() {
        assert!(validate_quality("standard").is_ok());
        assert!(validate_quality("hd").is_ok());
        assert!(validate_quality("ultra").is_err());
    }
}
