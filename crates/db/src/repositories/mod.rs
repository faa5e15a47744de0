//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod generation_repo;
pub mod image_repo;
pub mod theme_repo;

pub use generation_repo::GenerationRepo;
pub use image_repo::ImageRepo;
pub use theme_repo::ThemeRepo;
