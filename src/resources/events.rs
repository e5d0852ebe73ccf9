//! Event feed operations
//!
//! Read-only audit trail of account activity.

use std::sync::Arc;

use futures::Stream;

use super::push_param;
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{Event, PaginatedResponse};
use crate::validation::validate_id;

/// Filters for listing events
#[derive(Debug, Clone, Default)]
pub struct EventListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub object_type: Option<String>,
    pub object_id: Option<u64>,
    pub r#type: Option<String>,
    pub user_id: Option<u64>,
}

impl EventListParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "cursor", &self.cursor);
        push_param(&mut query, "limit", &self.limit);
        push_param(&mut query, "order_by", &self.order_by);
        push_param(&mut query, "object_type", &self.object_type);
        push_param(&mut query, "object_id", &self.object_id);
        push_param(&mut query, "type", &self.r#type);
        push_param(&mut query, "user_id", &self.user_id);
        query
    }
}

pub struct Events {
    http: Arc<HttpClient>,
}

impl Events {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of events
    pub async fn list(
        &self,
        params: &EventListParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<Event>, GorgiasError> {
        self.http.get_json("/events", params.to_query(), options).await
    }

    /// Iterate all events, following cursors automatically
    pub fn list_all(
        &self,
        params: EventListParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<Event, GorgiasError>> + '_ {
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

    pub async fn get(&self, id: u64, options: &RequestOptions) -> Result<Event, GorgiasError> {
        validate_id(id, "eventId")?;
        self.http
            .get_json(&format!("/events/{id}"), Vec::new(), options)
            .await
    }
}
