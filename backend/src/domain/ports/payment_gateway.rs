//! Port for opening hosted payment sessions with the payment gateway.

use async_trait::async_trait;

use crate::domain::BuyerContact;
use crate::domain::transactions::ExternalOrderId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters. All are safe to retry.
    pub enum PaymentGatewayError {
        /// The gateway did not answer within the configured timeout.
        Timeout { message: String } => "payment gateway timed out: {message}",
        /// Network or TLS failure before a response arrived.
        Transport { message: String } => "payment gateway transport failed: {message}",
        /// The gateway answered but refused the request.
        Rejected { message: String } => "payment gateway rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "payment gateway response invalid: {message}",
    }
}

/// The single line item sold in a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

/// Everything the gateway needs to open a payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSessionRequest {
    pub order_id: ExternalOrderId,
    pub gross_amount: u64,
    pub item: PaymentItem,
    pub customer: BuyerContact,
}

/// Hosted payment page handed back to the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub token: String,
    pub redirect_url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError>;
}

/// Fixture gateway returning a deterministic sandbox session.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let token = format!("fixture-{}", request.order_id);
        Ok(PaymentSession {
            redirect_url: format!("https://app.sandbox.midtrans.com/snap/v4/redirection/{token}"),
            token,
        })
    }
}
