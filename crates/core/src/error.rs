use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// An analysis function received an empty record set.
    #[error("No records provided for analysis")]
    NoData,

    /// Records exist but none of them carries a rating.
    #[error("No ratings found in the provided records")]
    NoRatings,

    #[error("Internal error: {0}")]
    Internal(String),
}
