//! Linear substring filter over contacts.
//!
//! # Invariants
//! - A blank term (empty or whitespace only) matches everything.
//! - `name` and `email` compare case-insensitively; `phone` compares as-is.
//! - Output keeps input order.

use crate::model::contact::Contact;

/// Returns contacts matching `term`, in collection order.
///
/// The term is lowercased but not trimmed, so `" ana"` only matches text
/// containing the leading space.
pub fn search_contacts<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    if is_blank(term) {
        return contacts.iter().collect();
    }

    let needle = term.to_lowercase();
    contacts
        .iter()
        .filter(|contact| contact_matches(contact, &needle))
        .collect()
}

/// Checks one contact against an already lowercased term.
pub fn contact_matches(contact: &Contact, lowered_term: &str) -> bool {
    contact.name.to_lowercase().contains(lowered_term)
        || contact.email.to_lowercase().contains(lowered_term)
        || contact.phone.contains(lowered_term)
}

/// Returns whether `term` has no visible characters.
pub fn is_blank(term: &str) -> bool {
    term.trim().is_empty()
}
