//! Business rules checked before a row is written. Every check reads through
//! the connection it is given, so running it on a transaction makes the
//! check and the following write atomic.

pub mod class_rules;
pub mod enrollment;
pub mod references;
pub mod schedule_rules;

pub use class_rules::{ensure_class_deletable, validate_class_update, validate_new_class};
pub use enrollment::{enroll, validate_enrollment};
pub use schedule_rules::{find_conflict, validate_schedule};
