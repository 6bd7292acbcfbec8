#![forbid(unsafe_code)]

//! Domain layer for the Korean learning app: the static lesson catalog, the
//! per-level progress entity, and the pure unlock/resume derivation. No I/O
//! lives here; persistence and orchestration sit in the `storage` and
//! `services` crates.

pub mod catalog;
pub mod error;
pub mod model;
pub mod progression;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use error::Error;
pub use progression::{LessonStatus, ProgressSnapshot, ResumePoint};
pub use time::Clock;
