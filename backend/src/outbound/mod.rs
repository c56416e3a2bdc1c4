//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **midtrans**: Snap payment sessions over HTTPS
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod midtrans;
pub mod persistence;
