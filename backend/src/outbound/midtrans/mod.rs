//! Midtrans outbound adapters.
//!
//! A thin HTTP implementation of the `PaymentGateway` port over the Snap API.

mod dto;
mod snap_client;

pub use snap_client::{SnapEnvironment, SnapHttpGateway};
