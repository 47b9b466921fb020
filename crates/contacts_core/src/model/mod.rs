//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and caller input shapes.
//! - Provide caller-side field validation rules.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
pub mod validation;
