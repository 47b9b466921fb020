//! Use-case services over the contact store.
//!
//! # Responsibility
//! - Keep front-end command handling out of the store.

pub mod contacts_session;
