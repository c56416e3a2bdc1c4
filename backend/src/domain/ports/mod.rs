//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PaymentGateway`], [`ExperienceAccrual`])
//! are implemented by outbound adapters. Driving ports ([`PurchaseCommand`],
//! [`PurchaseQuery`], [`GamificationQuery`]) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod experience_accrual;
mod gamification_query;
mod payment_gateway;
mod project_repository;
mod purchase_command;
mod purchase_query;
mod transaction_repository;
mod user_repository;

#[cfg(test)]
pub use experience_accrual::MockExperienceAccrual;
pub use experience_accrual::{AccrualFailure, ExpCredit, ExperienceAccrual};
#[cfg(test)]
pub use gamification_query::MockGamificationQuery;
pub use gamification_query::{FixtureGamificationQuery, GamificationQuery};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    FixturePaymentGateway, PaymentGateway, PaymentGatewayError, PaymentItem, PaymentSession,
    PaymentSessionRequest,
};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{FixtureProjectRepository, ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use purchase_command::MockPurchaseCommand;
pub use purchase_command::{
    CreatePurchaseRequest, CreatePurchaseResponse, FixturePurchaseCommand, NotificationReceipt,
    PurchaseCommand,
};
#[cfg(test)]
pub use purchase_query::MockPurchaseQuery;
pub use purchase_query::{FixturePurchaseQuery, PurchaseQuery};
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
pub use transaction_repository::{
    FixtureTransactionRepository, TransactionListing, TransactionRepository,
    TransactionRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
