//! # meridian-checkout: Checkout Protocol Client
//!
//! This crate owns everything that crosses the network boundary: the wire
//! DTOs, the HTTP client, and the configuration that points at the backend.
//!
//! ## Protocol at a Glance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Protocol                                  │
//! │                                                                         │
//! │  Register                              Platform Backend                 │
//! │  ────────                              ────────────────                 │
//! │                                                                         │
//! │  GET /pos/catalog?query=... ─────────► resolve barcode/SKU/name        │
//! │  ◄───────────── [ CatalogUnit, ... ]   (stock snapshot is advisory)    │
//! │                                                                         │
//! │  POST /pos/checkout ─────────────────► validate stock, settle sale     │
//! │    idempotency_key (fresh per attempt)                                  │
//! │    items:    [{barcode, quantity}]                                      │
//! │    payments: [{method, amount}]                                         │
//! │    discount_type/value (only if active)                                 │
//! │  ◄───────────── CheckoutResponse       authoritative totals, invoice   │
//! │                 (or structured error)   number, credit balance          │
//! │                                                                         │
//! │  RULES:                                                                 │
//! │  • exactly one POST per idempotency key - no client retry loop         │
//! │  • a user retry after failure mints a NEW key (the old request may     │
//! │    have landed server-side; reusing the key risks double-acceptance)   │
//! │  • the cart is never cleared on failure                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Wire DTOs and request construction (pure)
//! - [`client`] - The reqwest-backed `ApiClient` and the capability traits
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Transport and protocol error types

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use client::{ApiClient, CatalogLookup, CheckoutSubmit};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use protocol::{CheckoutRequest, CheckoutResponse, SettledSale};
