//! # API Client
//!
//! The reqwest-backed client for the catalog and checkout endpoints, and the
//! capability traits the session layer depends on.
//!
//! ## Capability Seams
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Client Capability Traits                            │
//! │                                                                         │
//! │   meridian-register ──depends on──► CatalogLookup / CheckoutSubmit     │
//! │                                          ▲                              │
//! │                                          │ implemented by               │
//! │                             ┌────────────┴────────────┐                │
//! │                             │                         │                │
//! │                        ApiClient                 test fakes            │
//! │                        (this file)           (in-memory, scripted)     │
//! │                                                                         │
//! │  The session layer never names reqwest; it holds a dyn trait object.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submission Discipline
//! `submit_checkout` performs exactly ONE network call. There is no retry
//! loop in here - transport failures and rejections surface to the state
//! machine, which parks in `Failed` until the user decides.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use meridian_core::SellableUnit;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::protocol::{ApiErrorBody, CatalogUnit, CheckoutRequest, CheckoutResponse, SettledSale};

// =============================================================================
// Capability Traits
// =============================================================================

/// Resolves a barcode/SKU/search string to sellable unit snapshots.
///
/// Staleness is expected and accepted - the stock in the snapshots is
/// advisory, re-validated server-side at checkout.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn search_catalog(&self, query: &str) -> CheckoutResult<Vec<SellableUnit>>;
}

/// Submits one checkout request and classifies the result.
#[async_trait]
pub trait CheckoutSubmit: Send + Sync {
    async fn submit_checkout(&self, request: &CheckoutRequest) -> CheckoutResult<SettledSale>;
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP client for the platform's POS endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    request_timeout_secs: u64,
}

impl ApiClient {
    /// Builds a client from configuration.
    ///
    /// Connect and whole-request timeouts come from config; the request
    /// timeout is what turns a hung checkout POST into a `Timeout` error
    /// instead of an indefinitely-stuck `Submitting` state.
    pub fn new(config: &CheckoutConfig) -> CheckoutResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.api.bearer_token.clone(),
            request_timeout_secs: config.api.request_timeout_secs,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> CheckoutError {
        if err.is_timeout() {
            CheckoutError::Timeout(self.request_timeout_secs)
        } else {
            CheckoutError::Network(err.to_string())
        }
    }

    /// Turns a non-2xx response into a `Rejected` error, preferring the
    /// server's structured message when the body parses.
    async fn rejection(&self, status: StatusCode, response: reqwest::Response) -> CheckoutError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or_else(|| "Checkout could not be completed".to_string());

        warn!(status = status.as_u16(), message = %message, "Server rejected request");
        CheckoutError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl CatalogLookup for ApiClient {
    async fn search_catalog(&self, query: &str) -> CheckoutResult<Vec<SellableUnit>> {
        let url = self.endpoint("pos/catalog");
        debug!(query = %query, "Searching catalog");

        let response = self
            .authorize(self.http.get(&url).query(&[("query", query)]))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.rejection(status, response).await);
        }

        let units: Vec<CatalogUnit> = response.json().await.map_err(|e| self.transport_error(e))?;

        debug!(hits = units.len(), "Catalog search returned");
        units.into_iter().map(CatalogUnit::into_sellable_unit).collect()
    }
}

#[async_trait]
impl CheckoutSubmit for ApiClient {
    async fn submit_checkout(&self, request: &CheckoutRequest) -> CheckoutResult<SettledSale> {
        let url = self.endpoint("pos/checkout");
        debug!(
            idempotency_key = %request.idempotency_key,
            items = request.items.len(),
            payments = request.payments.len(),
            "Submitting checkout"
        );

        let response = self
            .authorize(self.http.post(&url).json(request))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.rejection(status, response).await);
        }

        let body: CheckoutResponse = response.json().await.map_err(|e| self.transport_error(e))?;

        // A 2xx with success=false is still a rejection; some endpoints
        // report validation failures this way.
        if !body.success {
            warn!(status = %body.status, message = %body.message, "Checkout reported failure");
            return Err(CheckoutError::Rejected {
                status: status.as_u16(),
                message: if body.message.trim().is_empty() {
                    "Checkout could not be completed".to_string()
                } else {
                    body.message
                },
            });
        }

        let sale = SettledSale::from_response(body)?;
        info!(
            sale_id = %sale.sale_id,
            invoice = %sale.invoice_number,
            total_paise = sale.total_paise,
            is_credit_sale = sale.is_credit_sale,
            "Checkout settled"
        );
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
