//! Wire DTOs for the Midtrans Snap transaction endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ports::PaymentSessionRequest;

#[derive(Debug, Serialize)]
pub(super) struct SnapRequestDto<'a> {
    pub(super) transaction_details: TransactionDetailsDto<'a>,
    pub(super) credit_card: CreditCardDto,
    pub(super) item_details: [ItemDetailDto<'a>; 1],
    pub(super) customer_details: CustomerDetailsDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct TransactionDetailsDto<'a> {
    pub(super) order_id: &'a str,
    pub(super) gross_amount: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct CreditCardDto {
    pub(super) secure: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ItemDetailDto<'a> {
    pub(super) id: &'a str,
    pub(super) price: u64,
    pub(super) quantity: u32,
    pub(super) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CustomerDetailsDto<'a> {
    pub(super) first_name: &'a str,
    pub(super) email: &'a str,
}

impl<'a> From<&'a PaymentSessionRequest> for SnapRequestDto<'a> {
    fn from(request: &'a PaymentSessionRequest) -> Self {
        Self {
            transaction_details: TransactionDetailsDto {
                order_id: request.order_id.as_str(),
                gross_amount: request.gross_amount,
            },
            credit_card: CreditCardDto { secure: true },
            item_details: [ItemDetailDto {
                id: request.item.id.as_str(),
                price: request.item.price,
                quantity: request.item.quantity,
                name: request.item.name.as_str(),
            }],
            customer_details: CustomerDetailsDto {
                first_name: request.customer.name.as_str(),
                email: request.customer.email.as_str(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SnapResponseDto {
    #[serde(default)]
    pub(super) token: String,
    #[serde(default)]
    pub(super) redirect_url: String,
}

/// Error body Snap returns on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SnapErrorDto {
    #[serde(default)]
    pub(super) error_messages: Vec<String>,
}
