//! Entity structs for all Snagtrack domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs serialize
//! with camelCase field names, matching the JSON the web client consumes.

mod attachment;
mod comment;
mod defect;
mod project;
mod session;
mod site;
mod user;

pub use attachment::Attachment;
pub use comment::Comment;
pub use defect::Defect;
pub use project::Project;
pub use session::AuthSession;
pub use site::Site;
pub use user::User;
