//! User read model consumed by purchases and experience accrual.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error returned when a user identifier is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must be a valid UUID")]
pub struct InvalidUserId;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = "uuid")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated textual form.
    ///
    /// # Examples
    /// ```
    /// use campus_hub::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidUserId> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(InvalidUserId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| InvalidUserId)
    }

    /// Generate a random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name and email handed to the payment gateway as the buyer contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerContact {
    pub name: String,
    pub email: String,
}

/// User as seen by the purchase and gamification workflows.
///
/// `total_exp` is owned by experience accrual; nothing else writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    total_exp: u64,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, total_exp: u64) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            total_exp,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Accumulated experience points.
    pub fn total_exp(&self) -> u64 {
        self.total_exp
    }

    /// Contact details used when opening a payment session.
    pub fn contact(&self) -> BuyerContact {
        BuyerContact {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
