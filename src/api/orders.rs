//! Orders service for tracking certificate requests.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::{PagedStream, PagedStreamBuilder, DEFAULT_PAGE_SIZE};
use crate::client::ClientInner;
use crate::models::{Order, OrderNumber, OrderStatus, OrganizationId};
use crate::Result;

/// Service for certificate order operations.
///
/// Orders track enrollment and renewal requests through validation and
/// issuance; the order endpoint pages by sequential page number.
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing orders.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    /// Filter by processing status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Results per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    /// Page number, starting at 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List orders, optionally filtered.
    pub async fn list(&self, query: Option<OrdersQuery>) -> Result<Vec<Order>> {
        match query {
            Some(q) => self.inner.get_with_query("order/v1", &q).await,
            None => self.inner.get("order/v1").await,
        }
    }

    /// Get an order by its number.
    pub async fn get(&self, order_number: OrderNumber) -> Result<Order> {
        self.inner.get(&format!("order/v1/{order_number}")).await
    }

    /// Stream all orders matching a filter.
    ///
    /// Pages are fetched lazily by sequential page number as the stream is
    /// consumed.
    pub fn list_stream(&self, query: Option<OrdersQueryStream>) -> PagedStream<Order> {
        PagedStreamBuilder::<Order>::new(self.inner.clone(), "order/v1")
            .page_size(
                query
                    .as_ref()
                    .and_then(|q| q.size)
                    .unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .page_numbered()
            .build_with_query(query)
    }
}

/// Query parameters for streaming orders (without cursor fields).
///
/// Use this with `list_stream()`. Pagination is handled automatically by
/// the stream.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQueryStream {
    /// Filter by processing status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Results per page (controls fetch batch size)
    #[serde(skip_serializing)]
    pub size: Option<i32>,
}
