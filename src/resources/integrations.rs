//! Integration operations
//!
//! Read-only: integrations are managed through the Gorgias dashboard.

use std::sync::Arc;

use futures::Stream;

use super::PageParams;
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{Integration, PaginatedResponse};
use crate::validation::validate_id;

pub struct Integrations {
    http: Arc<HttpClient>,
}

impl Integrations {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of integrations
    pub async fn list(
        &self,
        params: &PageParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<Integration>, GorgiasError> {
        self.http
            .get_json("/integrations", params.to_query(), options)
            .await
    }

    /// Iterate all integrations, following cursors automatically
    pub fn list_all(
        &self,
        params: PageParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<Integration, GorgiasError>> + '_ {
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

    pub async fn get(
        &self,
        id: u64,
        options: &RequestOptions,
    ) -> Result<Integration, GorgiasError> {
        validate_id(id, "integrationId")?;
        self.http
            .get_json(&format!("/integrations/{id}"), Vec::new(), options)
            .await
    }
}
