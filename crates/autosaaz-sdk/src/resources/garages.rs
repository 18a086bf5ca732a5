//! Garage operations

use crate::client::ApiClient;
use crate::types::Garage;
use autosaaz_core::cache::{CacheKey, ResourceKind};
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

fn detail_key(id: &str) -> CacheKey {
    CacheKey::new("get-garage-detail", [("id", id)])
}

impl ApiClient {
    /// List registered garages, paginated
    pub async fn list_garages(&self, page: u32) -> AutosaazResult<Vec<Garage>> {
        let request = ApiRequest::get("get-garages").with_query("page", page);
        let payload = self.get_cached(ResourceKind::Garages, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single garage
    pub async fn get_garage(&self, id: &str) -> AutosaazResult<Garage> {
        let request = ApiRequest::get("get-garage-detail").with_query("id", id);
        let payload = self.get_cached(ResourceKind::Garages, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Suspend a garage from the marketplace
    pub async fn suspend_garage(&self, id: &str, reason: &str) -> AutosaazResult<()> {
        let request =
            ApiRequest::post("suspend-garage").with_body(json!({"id": id, "reason": reason}));
        self.execute_write(
            request,
            &[ResourceKind::Garages.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }

    /// Release a suspended garage back onto the marketplace
    pub async fn release_garage(&self, id: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("release-garage").with_body(json!({"id": id}));
        self.execute_write(
            request,
            &[ResourceKind::Garages.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }
}
