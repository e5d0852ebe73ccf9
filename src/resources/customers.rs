//! Customer operations

use std::sync::Arc;

use futures::Stream;
use serde::Serialize;

use super::push_param;
use crate::error::GorgiasError;
use crate::http::types::RequestOptions;
use crate::http::HttpClient;
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{Customer, CustomerCreate, CustomerUpdate, PaginatedResponse};
use crate::validation::{validate_id, validate_non_empty_slice};

/// Filters for listing customers
#[derive(Debug, Clone, Default)]
pub struct CustomerListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub email: Option<String>,
    pub external_id: Option<String>,
}

impl CustomerListParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "cursor", &self.cursor);
        push_param(&mut query, "limit", &self.limit);
        push_param(&mut query, "order_by", &self.order_by);
        push_param(&mut query, "email", &self.email);
        push_param(&mut query, "external_id", &self.external_id);
        query
    }
}

#[derive(Serialize)]
struct DeleteManyBody<'a> {
    customers: &'a [u64],
}

pub struct Customers {
    http: Arc<HttpClient>,
}

impl Customers {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// List one page of customers
    pub async fn list(
        &self,
        params: &CustomerListParams,
        options: &RequestOptions,
    ) -> Result<PaginatedResponse<Customer>, GorgiasError> {
        self.http
            .get_json("/customers", params.to_query(), options)
            .await
    }

    /// Iterate all customers, following cursors automatically
    pub fn list_all(
        &self,
        params: CustomerListParams,
        config: PaginationConfig,
    ) -> impl Stream<Item = Result<Customer, GorgiasError>> + '_ {
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

    pub async fn get(&self, id: u64, options: &RequestOptions) -> Result<Customer, GorgiasError> {
        validate_id(id, "customerId")?;
        self.http
            .get_json(&format!("/customers/{id}"), Vec::new(), options)
            .await
    }

    pub async fn create(
        &self,
        data: &CustomerCreate,
        options: &RequestOptions,
    ) -> Result<Customer, GorgiasError> {
        self.http.post_json("/customers", data, options).await
    }

    pub async fn update(
        &self,
        id: u64,
        data: &CustomerUpdate,
        options: &RequestOptions,
    ) -> Result<Customer, GorgiasError> {
        validate_id(id, "customerId")?;
        self.http
            .put_json(&format!("/customers/{id}"), data, options)
            .await
    }

    pub async fn delete(&self, id: u64, options: &RequestOptions) -> Result<(), GorgiasError> {
        validate_id(id, "customerId")?;
        self.http
            .delete(
                &format!("/customers/{id}"),
                None::<&serde_json::Value>,
                options,
            )
            .await
    }

    /// Delete several customers in one call
    pub async fn delete_many(
        &self,
        customer_ids: &[u64],
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        validate_non_empty_slice(customer_ids, "customerIds")?;
        self.http
            .delete(
                "/customers",
                Some(&DeleteManyBody {
                    customers: customer_ids,
                }),
                options,
            )
            .await
    }
}
