//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL; doubly-optional
//! fields distinguish "leave alone" from "clear to NULL".

pub mod defect;
