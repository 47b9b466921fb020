//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and its caller-facing DTOs.
//! - Own the persisted JSON shape (`camelCase`, ISO-8601 `createdAt`).
//!
//! # Invariants
//! - `id` and `created_at` are system-assigned and never carried by DTOs.
//! - `created_at` is kept at millisecond precision so persisted and
//!   in-memory values compare equal after a reload.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one contact.
///
/// Kept as a plain string so collections written by older clients with
/// non-UUID ids still load.
pub type ContactId = String;

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique within one store, immutable after creation.
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Creation instant, serialized as `createdAt`.
    #[serde(with = "created_at_format")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Builds a new contact from caller input with a fresh id and the
    /// current instant as creation time.
    pub fn new(dto: CreateContactDto) -> Self {
        Self::with_id(generate_contact_id(), dto, now_millis())
    }

    /// Builds a contact with caller-provided identity and creation time.
    ///
    /// Used by load/import paths where identity already exists.
    pub fn with_id(
        id: impl Into<ContactId>,
        dto: CreateContactDto,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// Overwrites only the fields present in `patch`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: UpdateContactDto) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }

    /// Returns the editable fields as a form prefill.
    pub fn to_dto(&self) -> CreateContactDto {
        CreateContactDto {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Caller input for creating or fully editing a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactDto {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CreateContactDto {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// Partial update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateContactDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UpdateContactDto {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

impl From<CreateContactDto> for UpdateContactDto {
    fn from(value: CreateContactDto) -> Self {
        Self {
            name: Some(value.name),
            email: Some(value.email),
            phone: Some(value.phone),
        }
    }
}

/// Generates a new contact id.
///
/// Uniqueness is probabilistic (UUID v4); callers that hold a collection
/// still check for collisions.
pub fn generate_contact_id() -> ContactId {
    Uuid::new_v4().simple().to_string()
}

/// Current instant truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

mod created_at_format {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(serde::de::Error::custom)
    }
}
