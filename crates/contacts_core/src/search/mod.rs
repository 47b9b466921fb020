//! Contact search.
//!
//! # Responsibility
//! - Filter an in-memory contact collection by a free-text term.
//! - Keep matching rules in one place for the store and the session.

pub mod filter;
