//! # taskdeck-core
//!
//! Core types, rules and traits for taskdeck.
//!
//! This crate holds everything that does not need a database or an HTTP
//! server: the domain models, request validation, the smart-score ranking,
//! listing sorts and the structured filter parser.

pub mod dates;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod requests;
pub mod sorting;
pub mod tags;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::{StatusFilter, TaskFilter};
pub use models::*;
pub use ranking::smart_score;
pub use requests::*;
pub use sorting::{arrange_tasks, sort_projects, ProjectSortMethod, TaskSortMethod};
pub use tags::normalize_tags;
pub use traits::*;
