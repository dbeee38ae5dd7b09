//! Repository modules implementing CRUD operations for all Snagtrack
//! entities.
//!
//! Each module adds methods to `SnagService` via `impl SnagService` blocks.

pub mod attachment;
pub mod comment;
pub mod defect;
pub mod project;
pub mod report;
pub mod session;
pub mod site;
pub mod user;
