//! Pure domain logic for the texture generation loop.
//!
//! Everything in this crate is a synchronous, stateless function over its
//! arguments plus constant taxonomy/policy tables: no I/O, no shared mutable
//! state, no hidden randomness. Where a function needs random choices
//! ([`prompts`]), the RNG handle is an explicit parameter so callers control
//! determinism.
//!
//! Module map:
//! - [`keywords`] — `##tag` extraction and the keyword taxonomy
//! - [`ratings`] — theme performance and keyword effectiveness analysis
//! - [`prompts`] — prompt variation engine (the generation feedback loop)
//! - [`policy`] — tunable thresholds and fixed word lists
//! - [`validation`] — request parameter validation helpers

pub mod error;
pub mod keywords;
pub mod policy;
pub mod prompts;
pub mod ratings;
pub mod types;
pub mod validation;

/// Round to two decimal places, the precision used for all reported metrics.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
