//! Typed resource accessors
//!
//! Thin mapping of domain operations onto HTTP calls through the shared
//! [`crate::http::HttpClient`]. IDs are validated client-side before any
//! network I/O; list endpoints share the cursor pagination machinery.

pub mod customers;
pub mod events;
pub mod integrations;
pub mod messages;
pub mod tickets;
pub mod users;

pub use customers::{CustomerListParams, Customers};
pub use events::{EventListParams, Events};
pub use integrations::Integrations;
pub use messages::{MessageListParams, Messages};
pub use tickets::{TicketListParams, Tickets};
pub use users::Users;

/// Plain cursor/ordering parameters for endpoints without extra filters
#[derive(Debug, Clone, Default)]
pub struct PageParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
}

impl PageParams {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "cursor", &self.cursor);
        push_param(&mut query, "limit", &self.limit);
        push_param(&mut query, "order_by", &self.order_by);
        query
    }
}

/// Append a query pair, omitting absent values entirely
pub(crate) fn push_param<T: ToString>(
    query: &mut Vec<(String, String)>,
    key: &str,
    value: &Option<T>,
) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}
