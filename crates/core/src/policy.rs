//! Tunable analysis and generation policy.
//!
//! These thresholds are policy, not physics: they are kept as named
//! constants in one place so operators can retune them without hunting
//! for literals scattered through the analyzers.

// ---------------------------------------------------------------------------
// Rating bounds
// ---------------------------------------------------------------------------

/// Lowest rating a human can assign.
pub const MIN_RATING: i32 = 1;
/// Highest rating a human can assign.
pub const MAX_RATING: i32 = 5;
/// Ratings at or above this count as "high rated".
pub const HIGH_RATING_THRESHOLD: i32 = 4;

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

pub const MIN_VARIATIONS: u32 = 1;
pub const MAX_VARIATIONS: u32 = 6;
pub const DEFAULT_VARIATIONS: u32 = 4;

/// DALL-E 3 minimum size.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
/// Sizes the image API accepts.
pub const VALID_IMAGE_SIZES: &[&str] = &["1024x1024", "1792x1024", "1024x1792"];

pub const DEFAULT_QUALITY: &str = "standard";
pub const VALID_QUALITIES: &[&str] = &["standard", "hd"];

// ---------------------------------------------------------------------------
// Keyword analysis
// ---------------------------------------------------------------------------

/// A keyword needs at least this many rated samples before the analyzer
/// reports it at all (precision over recall).
pub const MIN_SAMPLES_FOR_ANALYSIS: usize = 3;

/// Sample count for `high` keyword confidence.
pub const HIGH_CONFIDENCE_MIN_SAMPLES: usize = 10;
/// Sample count for `medium` keyword confidence.
pub const MEDIUM_CONFIDENCE_MIN_SAMPLES: usize = 5;

pub const HIGH_SUCCESS_RATE: f64 = 0.7;
pub const MEDIUM_SUCCESS_RATE: f64 = 0.5;
pub const LOW_SUCCESS_RATE: f64 = 0.3;

// ---------------------------------------------------------------------------
// Suggestion confidence
// ---------------------------------------------------------------------------

// These record-count thresholds are deliberately distinct from the
// 10/5 keyword-confidence pair above; the two policies were tuned
// independently and must not be collapsed into one.

/// Records required for `high` suggestion confidence.
pub const SUGGESTION_HIGH_MIN_RECORDS: usize = 20;
/// Records required for `medium` suggestion confidence.
pub const SUGGESTION_MEDIUM_MIN_RECORDS: usize = 10;

// ---------------------------------------------------------------------------
// Theme performance tiers
// ---------------------------------------------------------------------------

// Each tier requires BOTH its success-rate and average-rating threshold.

pub const EXCELLENT_SUCCESS_RATE: f64 = 0.7;
pub const EXCELLENT_AVG_RATING: f64 = 4.0;
pub const GOOD_SUCCESS_RATE: f64 = 0.5;
pub const GOOD_AVG_RATING: f64 = 3.5;
pub const FAIR_SUCCESS_RATE: f64 = 0.3;
pub const FAIR_AVG_RATING: f64 = 3.0;

// ---------------------------------------------------------------------------
// Trend detection
// ---------------------------------------------------------------------------

/// Minimum records before a trend is reported at all.
pub const TREND_MIN_RECORDS: usize = 5;
/// Minimum rated records before a trend is reported.
pub const TREND_MIN_RATED: usize = 3;
/// How many early/recent ratings to compare.
pub const TREND_WINDOW: usize = 3;
/// Mean-rating delta beyond which the trend counts as improving/declining.
pub const TREND_BAND: f64 = 0.5;

// ---------------------------------------------------------------------------
// Descriptive word extraction
// ---------------------------------------------------------------------------

/// Words ignored when pulling descriptive keywords out of a prompt.
pub const STOP_WORDS: &[&str] = &["with", "and", "the", "for", "are", "this", "that"];
/// Descriptive words must be strictly longer than this.
pub const MIN_WORD_LENGTH: usize = 3;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_RECENT_LIMIT: i64 = 20;
