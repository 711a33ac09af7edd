//! Platform user records.

use serde::{Deserialize, Serialize};

use super::de::lenient_string;
use super::entity::{Entity, EntityKind, Searchable};
use super::id::UserId;
use super::status::UserStatus;

/// A platform user (product owner / reviewer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    /// Legacy id column some endpoints send instead of (or next to) `id`.
    pub userid: UserId,
    #[serde(alias = "username", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub facebook: String,
    #[serde(deserialize_with = "lenient_string")]
    pub designation: String,
    #[serde(rename = "aboutMe", alias = "about", deserialize_with = "lenient_string")]
    pub about_me: String,
    pub status: UserStatus,
    #[serde(
        rename = "createdDate",
        alias = "createddate",
        deserialize_with = "lenient_string"
    )]
    pub created_date: String,
}

impl User {
    /// The user's id, preferring `id` over the legacy `userid` column.
    #[must_use]
    pub fn key(&self) -> &UserId {
        if self.id.is_empty() { &self.userid } else { &self.id }
    }

    /// Whether products may be assigned to this user.
    #[must_use]
    pub const fn can_own_products(&self) -> bool {
        matches!(self.status, UserStatus::Active)
    }
}

impl Entity for User {
    fn kind(&self) -> EntityKind {
        EntityKind::User
    }

    fn entity_id(&self) -> &str {
        self.key().as_str()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.designation]
    }
}
