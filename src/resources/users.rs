//! Agent user operations

use std::sync::Arc;

use futures::Stream;

use super::PageParams;
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{PaginatedResponse, User, UserCreate, UserUpdate};
use crate::validation::validate_id;

pub struct Users {
    http: Arc<HttpClient>,
}

impl Users {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of users
    pub async fn list(
        &self,
        params: &PageParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<User>, GorgiasError> {
        self.http.get_json("/users", params.to_query(), options).await
    }

    /// Iterate all users, following cursors automatically
    pub fn list_all(
        &self,
        params: PageParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<User, GorgiasError>> + '_ {
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

    pub async fn get(&self, id: u64, options: &RequestOptions) -> Result<User, GorgiasError> {
        validate_id(id, "userId")?;
        self.http
            .get_json(&format!("/users/{id}"), Vec::new(), options)
            .await
    }

    pub async fn create(
        &self,
        data: &UserCreate,
        options: &RequestOptions,
    ) -> Result<User, GorgiasError> {
        self.http.post_json("/users", data, options).await
    }

    pub async fn update(
        &self,
        id: u64,
        data: &UserUpdate,
        options: &RequestOptions,
    ) -> Result<User, GorgiasError> {
        validate_id(id, "userId")?;
        self.http
            .put_json(&format!("/users/{id}"), data, options)
            .await
    }

    pub async fn delete(&self, id: u64, options: &RequestOptions) -> Result<(), GorgiasError> {
        validate_id(id, "userId")?;
        self.http
            .delete(&format!("/users/{id}"), None::<&serde_json::Value>, options)
            .await
    }
}
