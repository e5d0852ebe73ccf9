//! Ticket operations

use std::sync::Arc;

use futures::Stream;
use serde::Serialize;

use super::push_param;
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{PaginatedResponse, Tag, Ticket, TicketCreate, TicketUpdate};
use crate::validation::{validate_id, validate_non_empty_slice};

/// Filters for listing tickets
#[derive(Debug, Clone, Default)]
pub struct TicketListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub customer_id: Option<u64>,
    pub assignee_user_id: Option<u64>,
    pub status: Option<String>,
    pub channel: Option<String>,
}

impl TicketListParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "cursor", &self.cursor);
        push_param(&mut query, "limit", &self.limit);
        push_param(&mut query, "order_by", &self.order_by);
        push_param(&mut query, "customer_id", &self.customer_id);
        push_param(&mut query, "assignee_user_id", &self.assignee_user_id);
        push_param(&mut query, "status", &self.status);
        push_param(&mut query, "channel", &self.channel);
        query
    }
}

#[derive(Serialize)]
struct TagsBody<'a> {
    tags: &'a [String],
}

pub struct Tickets {
    http: Arc<HttpClient>,
}

impl Tickets {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of tickets
    pub async fn list(
        &self,
        params: &TicketListParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<Ticket>, GorgiasError> {
        self.http
            .get_json("/tickets", params.to_query(), options)
            .await
    }

    /// Iterate all tickets, following cursors automatically
    pub fn list_all(
        &self,
        params: TicketListParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<Ticket, GorgiasError>> + '_ {
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

    pub async fn get(&self, id: u64, options: &RequestOptions) -> Result<Ticket, GorgiasError> {
        validate_id(id, "ticketId")?;
        self.http
            .get_json(&format!("/tickets/{id}"), Vec::new(), options)
            .await
    }

    pub async fn create(
        &self,
        data: &TicketCreate,
        options: &RequestOptions,
    ) -> Result<Ticket, GorgiasError> {
        self.http.post_json("/tickets", data, options).await
    }

    pub async fn update(
        &self,
        id: u64,
        data: &TicketUpdate,
        options: &RequestOptions,
    ) -> Result<Ticket, GorgiasError> {
        validate_id(id, "ticketId")?;
        self.http
            .put_json(&format!("/tickets/{id}"), data, options)
            .await
    }

    pub async fn delete(&self, id: u64, options: &RequestOptions) -> Result<(), GorgiasError> {
        validate_id(id, "ticketId")?;
        self.http
            .delete(
                &format!("/tickets/{id}"),
                None::<&serde_json::Value>,
                options,
            )
            .await
    }

    /// Add tags to a ticket, keeping existing ones
    pub async fn add_tags(
        &self,
        ticket_id: u64,
        tags: &[String],
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        validate_non_empty_slice(tags, "tags")?;
        self.http
            .post_empty(
                &format!("/tickets/{ticket_id}/tags"),
                &TagsBody { tags },
                options,
            )
            .await
    }

    /// Remove the given tags from a ticket
    pub async fn remove_tags(
        &self,
        ticket_id: u64,
        tags: &[String],
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        validate_non_empty_slice(tags, "tags")?;
        self.http
            .delete(
                &format!("/tickets/{ticket_id}/tags"),
                Some(&TagsBody { tags }),
                options,
            )
            .await
    }

    /// Replace all tags on a ticket. An empty slice clears them.
    pub async fn set_tags(
        &self,
        ticket_id: u64,
        tags: &[String],
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        self.http
            .put_empty(
                &format!("/tickets/{ticket_id}/tags"),
                &TagsBody { tags },
                options,
            )
            .await
    }

    pub async fn list_tags(
        &self,
        ticket_id: u64,
        options: &RequestOptions,
    ) -> Result<Vec<Tag>, GorgiasError> {
        validate_id(ticket_id, "ticketId")?;
        self.http
            .get_json(&format!("/tickets/{ticket_id}/tags"), Vec::new(), options)
            .await
    }
}
