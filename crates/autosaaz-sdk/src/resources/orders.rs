//! Order operations

use crate::client::ApiClient;
use crate::types::Order;
use autosaaz_core::cache::ResourceKind;
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;

impl ApiClient {
    /// List service orders, optionally filtered by status
    pub async fn list_orders(&self, status: Option<&str>, page: u32) -> AutosaazResult<Vec<Order>> {
        let mut request = ApiRequest::get("get-orders").with_query("page", page);
        if let Some(status) = status {
            request = request.with_query("status", status);
        }
        let payload = self.get_cached(ResourceKind::Orders, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single order
    pub async fn get_order(&self, id: &str) -> AutosaazResult<Order> {
        let request = ApiRequest::get("get-order-detail").with_query("id", id);
        let payload = self.get_cached(ResourceKind::Orders, request).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
