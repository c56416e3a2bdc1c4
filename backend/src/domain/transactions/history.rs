//! Paginated transaction history for a user.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{TransactionId, TransactionStatus};
use crate::domain::ProjectId;

/// Page size used when the requested one is out of range.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Which side of a transaction the user must be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    /// Transactions where the user is buyer or seller.
    #[default]
    All,
    /// Transactions where the user is the buyer.
    Purchases,
    /// Transactions where the user is the seller.
    Sales,
}

/// Error returned for an unrecognised filter value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction filter: {0}")]
pub struct UnknownTransactionFilter(pub String);

impl std::str::FromStr for TransactionFilter {
    type Err = UnknownTransactionFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "purchases" => Ok(Self::Purchases),
            "sales" => Ok(Self::Sales),
            other => Err(UnknownTransactionFilter(other.to_owned())),
        }
    }
}

/// Normalised pagination window.
///
/// # Examples
/// ```
/// use campus_hub::domain::transactions::PageRequest;
///
/// let page = PageRequest::normalised(Some(0), Some(500));
/// assert_eq!((page.page(), page.per_page()), (1, 10));
/// assert_eq!(PageRequest::normalised(Some(3), Some(20)).offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Clamp raw query values: pages below 1 become 1, page sizes outside
    /// `1..=MAX_PER_PAGE` fall back to [`DEFAULT_PER_PAGE`].
    pub fn normalised(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p >= 1)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        let per_page = per_page
            .and_then(|p| u32::try_from(p).ok())
            .filter(|p| (1..=MAX_PER_PAGE).contains(p))
            .unwrap_or(DEFAULT_PER_PAGE);
        Self { page, per_page }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalised(None, None)
    }
}

/// One row of the history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub id: TransactionId,
    pub project_id: ProjectId,
    pub project_title: String,
    pub buyer_name: String,
    pub amount: u64,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// A page of history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<TransactionSummary>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl TransactionPage {
    pub fn new(items: Vec<TransactionSummary>, total: u64, request: PageRequest) -> Self {
        let per_page = u64::from(request.per_page());
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
            total_pages: total.div_ceil(per_page),
        }
    }
}
