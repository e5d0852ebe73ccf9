//! Message operations
//!
//! Messages live both under their own collection (`/messages`) and nested
//! under a ticket; creation always goes through the ticket.

use std::sync::Arc;

use futures::Stream;

use super::{push_param, PageParams};
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{MessageCreate, MessageUpdate, PaginatedResponse, TicketMessage};
use crate::validation::validate_id;

/// Filters for listing messages across tickets
#[derive(Debug, Clone, Default)]
pub struct MessageListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub ticket_id: Option<u64>,
}

impl MessageListParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "cursor", &self.cursor);
        push_param(&mut query, "limit", &self.limit);
        push_param(&mut query, "order_by", &self.order_by);
        push_param(&mut query, "ticket_id", &self.ticket_id);
        query
    }
}

pub struct Messages {
    http: Arc<HttpClient>,
}

impl Messages {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of messages
    pub async fn list(
        &self,
        params: &MessageListParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<TicketMessage>, GorgiasError> {
        self.http
            .get_json("/messages", params.to_query(), options)
            .await
    }

    /// Iterate all messages, following cursors automatically
    pub fn list_all(
        &self,
        params: MessageListParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<TicketMessage, GorgiasError>> + '_ {
        paginate(
            move |cursor, limit| {
                let mut page = params.clone();
                page.cursor = cursor;
                page.limit = Some(limit);
                async move { self.list(&page, &RequestOptions::default()).await }
            },
            config,
        )
    }

    /// List one page of a single ticket's messages
    pub async fn list_for_ticket(
        &self,
        ticket_id: u64,
        params: &PageParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<TicketMessage>, GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        self.http
            .get_json(
                &format!("/tickets/{ticket_id}/messages"),
                params.to_query(),
                options,
            )
            .await
    }

    /// Iterate all messages of one ticket
    pub fn list_all_for_ticket(
        &self,
        ticket_id: u64,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<TicketMessage, GorgiasError>> + '_ {
        paginate(
            move |cursor, limit| async move {
                let params = PageParams {
                    cursor,
                    limit: Some(limit),
                    order_by: None,
                };
                self.list_for_ticket(ticket_id, &params, &RequestOptions::default())
                    .await
            },
            config,
        )
    }

    pub async fn get(
        &self,
        id: u64,
        options: &RequestOptions,
    ) -> Result<TicketMessage, GorgiasError> {
        validate_id(id, "messageId")?;
        self.http
            .get_json(&format!("/messages/{id}"), Vec::new(), options)
            .await
    }

    /// Create a message on a ticket
    pub async fn create(
        &self,
        ticket_id: u64,
        data: &MessageCreate,
        options: &RequestOptions,
    ) -> Result<TicketMessage, GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        self.http
            .post_json(&format!("/tickets/{ticket_id}/messages"), data, options)
            .await
    }

    pub async fn update(
        &self,
        id: u64,
        data: &MessageUpdate,
        options: &RequestOptions,
    ) -> Result<TicketMessage, GorgiasError> {
        validate_id(id, "messageId")?;
        self.http
            .put_json(&format!("/messages/{id}"), data, options)
            .await
    }

    pub async fn delete(&self, id: u64, options: &RequestOptions) -> Result<(), GorgiasError> {
        validate_id(id, "messageId")?;
        self.http
            .delete(
                &format!("/messages/{id}"),
                None::<&serde_json::Value>,
                options,
            )
            .await
    }
}
