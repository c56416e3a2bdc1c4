//! Failures of the purchase workflow and their mapping onto [`Error`].

use serde_json::json;

use crate::domain::{Error, ErrorCode};

/// Typed failure raised by purchase creation and notification handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("project {project_id} not found")]
    ProjectNotFound { project_id: String },
    #[error("buyer {user_id} not found")]
    BuyerNotFound { user_id: String },
    #[error("transaction for order {order_id} not found")]
    TransactionNotFound { order_id: String },
    #[error("project {project_id} is free and cannot be purchased")]
    NotPurchasable { project_id: String },
    #[error("project {project_id} already purchased")]
    AlreadyPurchased { project_id: String },
    #[error("notification signature for order {order_id} is invalid")]
    InvalidSignature { order_id: String },
    #[error("payment gateway unavailable: {message}")]
    TransientGateway { message: String },
    #[error("transaction storage unavailable: {message}")]
    StorageUnavailable { message: String },
    #[error("transaction storage error: {message}")]
    Storage { message: String },
}

impl From<PurchaseError> for Error {
    fn from(value: PurchaseError) -> Self {
        let message = value.to_string();
        match value {
            PurchaseError::ProjectNotFound { project_id } => {
                Error::not_found(message).with_details(json!({ "projectId": project_id }))
            }
            PurchaseError::BuyerNotFound { .. } => Error::not_found(message),
            PurchaseError::TransactionNotFound { order_id } => {
                Error::not_found(message).with_details(json!({ "orderId": order_id }))
            }
            PurchaseError::NotPurchasable { project_id } => {
                Error::new(ErrorCode::NotPurchasable, message)
                    .with_details(json!({ "projectId": project_id }))
            }
            PurchaseError::AlreadyPurchased { project_id } => {
                Error::new(ErrorCode::AlreadyPurchased, message)
                    .with_details(json!({ "projectId": project_id }))
            }
            PurchaseError::InvalidSignature { .. } => {
                Error::new(ErrorCode::InvalidSignature, "notification signature is invalid")
            }
            PurchaseError::TransientGateway { .. } | PurchaseError::StorageUnavailable { .. } => {
                Error::service_unavailable(message)
            }
            PurchaseError::Storage { .. } => Error::internal(message),
        }
    }
}
