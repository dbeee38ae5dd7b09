//! # snag-core
//!
//! Core types and the access-policy rule set for Snagtrack.
//!
//! This crate provides the foundational types shared across all Snagtrack
//! crates:
//! - Entity structs for all domain objects (projects, sites, defects, etc.)
//! - Closed status/priority/role enums
//! - ID prefix constants
//! - Request-scoped authenticated identity
//! - The role-based access policy gating every mutation
//! - API response types (joined rows, counts, report aggregates)

pub mod entities;
pub mod enums;
pub mod identity;
pub mod ids;
pub mod policy;
pub mod responses;
