//! Domain entities, pure logic, services and ports.
//!
//! Nothing in this module knows about HTTP or SQL. Adapters reach the domain
//! only through the traits in [`ports`].
//!
//! Public surface:
//! - [`leveling`]: the experience ledger (level, title, progress).
//! - [`experience`]: experience events and the accrual service.
//! - [`transactions`]: purchase transactions, the payment state machine and
//!   the reward orchestrator.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod error;
pub mod experience;
pub mod gamification_service;
pub mod leveling;
pub mod ports;
pub mod project;
pub mod purchase_query_service;
pub mod trace_id;
pub mod transactions;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::experience::{ExperienceAccrualService, ExperienceEvent};
pub use self::gamification_service::GamificationService;
pub use self::project::{Project, ProjectId, ProjectKind, UnknownProjectKind};
pub use self::purchase_query_service::PurchaseQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{BuyerContact, InvalidUserId, User, UserId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use campus_hub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
