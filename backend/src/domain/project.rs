//! Project read model used to validate purchases.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Stable project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = "uuid")]
pub struct ProjectId(Uuid);

impl ProjectId {
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

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a project is given away or sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Free,
    Paid,
}

impl ProjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }
}

/// Error returned when a stored project kind is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project kind: {0}")]
pub struct UnknownProjectKind(pub String);

impl std::str::FromStr for ProjectKind {
    type Err = UnknownProjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownProjectKind(other.to_owned())),
        }
    }
}

/// Project as needed by the purchase workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub title: String,
    pub kind: ProjectKind,
    /// Price in minor currency units. Zero for free projects.
    pub price: u64,
}

impl Project {
    /// Paid projects with a positive price can be bought.
    pub fn is_purchasable(&self) -> bool {
        self.kind == ProjectKind::Paid && self.price > 0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn project(kind: ProjectKind, price: u64) -> Project {
        Project {
            id: ProjectId::random(),
            owner_id: UserId::random(),
            title: "Sistem Informasi Perpustakaan".to_owned(),
            kind,
            price,
        }
    }

    #[rstest]
    #[case(ProjectKind::Paid, 50_000, true)]
    #[case(ProjectKind::Paid, 0, false)]
    #[case(ProjectKind::Free, 0, false)]
    #[case(ProjectKind::Free, 10_000, false)]
    fn purchasable_only_when_paid_with_price(
        #[case] kind: ProjectKind,
        #[case] price: u64,
        #[case] expected: bool,
    ) {
        assert_eq!(project(kind, price).is_purchasable(), expected);
    }

    #[rstest]
    #[case("free", ProjectKind::Free)]
    #[case("paid", ProjectKind::Paid)]
    fn kind_parses_stored_values(#[case] raw: &str, #[case] expected: ProjectKind) {
        let parsed: ProjectKind = raw.parse().expect("known kind");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    fn kind_rejects_unknown_values() {
        assert_eq!(
            "premium".parse::<ProjectKind>(),
            Err(UnknownProjectKind("premium".to_owned()))
        );
    }
}
