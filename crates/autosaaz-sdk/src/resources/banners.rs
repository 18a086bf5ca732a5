//! Banner operations

use crate::client::ApiClient;
use crate::types::{Banner, BannerInput};
use autosaaz_core::cache::ResourceKind;
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

impl ApiClient {
    /// List promotional banners
    pub async fn list_banners(&self) -> AutosaazResult<Vec<Banner>> {
        let request = ApiRequest::get("get-banners");
        let payload = self.get_cached(ResourceKind::Banners, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Create a banner
    pub async fn create_banner(&self, input: &BannerInput) -> AutosaazResult<Banner> {
        let request = ApiRequest::post("create-banner").with_body(serde_json::to_value(input)?);
        let payload = self
            .execute_write(request, &[ResourceKind::Banners.family_pattern()], None)
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Update an existing banner
    pub async fn update_banner(&self, id: &str, input: &BannerInput) -> AutosaazResult<()> {
        let mut body = serde_json::to_value(input)?;
        body["id"] = json!(id);
        let request = ApiRequest::post("update-banner").with_body(body);
        self.execute_write(request, &[ResourceKind::Banners.family_pattern()], None)
            .await?;
        Ok(())
    }

    /// Delete a banner
    pub async fn delete_banner(&self, id: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("delete-banner").with_body(json!({"id": id}));
        self.execute_write(request, &[ResourceKind::Banners.family_pattern()], None)
            .await?;
        Ok(())
    }
}
