//! Async client for the Gorgias helpdesk REST API.
//!
//! Covers customers, tickets, messages, users, integrations and events,
//! with Basic auth, typed errors, automatic retries with exponential
//! backoff, per-request timeouts and cancellation, and cursor pagination
//! exposed as async streams.
//!
//! ```no_run
//! use gorgias_client::{GorgiasClient, GorgiasConfig, RequestOptions};
//!
//! # async fn run() -> Result<(), gorgias_client::GorgiasError> {
//! let client = GorgiasClient::new(GorgiasConfig::new(
//!     "mycompany",
//!     "agent@mycompany.com",
//!     "api-key",
//! ))?;
//!
//! let ticket = client.tickets.get(42, &RequestOptions::default()).await?;
//! println!("{:?}", ticket.subject);
//! # Ok(())
//! # }
//! ```
//!
//! Every list endpoint has a `list_all` variant that follows cursors lazily:
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use gorgias_client::{PaginationConfig, TicketListParams};
//!
//! # async fn run(client: gorgias_client::GorgiasClient) -> Result<(), gorgias_client::GorgiasError> {
//! let mut tickets = client
//!     .tickets
//!     .list_all(TicketListParams::default(), PaginationConfig::default());
//! futures::pin_mut!(tickets);
//! while let Some(ticket) = tickets.try_next().await? {
//!     println!("{}", ticket.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod types;
pub mod validation;

pub use client::GorgiasClient;
pub use config::{
    GorgiasConfig, RetryConfig, RetryOverride, RetryPatch, DEFAULT_TIMEOUT,
    DEFAULT_TRACE_ID_HEADER,
};
pub use error::{ErrorContext, FieldError, GorgiasError, RequestContext};
pub use http::types::{Headers, HttpMethod, RequestOptions, RequestSpec, ResponseEnvelope};
pub use http::{HttpClient, HttpClientConfig, HttpTransport, ReqwestTransport};
pub use pagination::{collect_all, paginate, PaginationConfig, DEFAULT_PAGE_SIZE};
pub use resources::{
    CustomerListParams, Customers, EventListParams, Events, Integrations, MessageListParams,
    Messages, PageParams, TicketListParams, Tickets, Users,
};
pub use types::*;
