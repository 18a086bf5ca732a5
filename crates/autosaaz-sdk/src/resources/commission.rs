//! Commission settings operations

use crate::client::ApiClient;
use crate::types::CommissionSettings;
use autosaaz_core::cache::ResourceKind;
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

impl ApiClient {
    /// Fetch the current marketplace commission settings
    pub async fn get_commission_settings(&self) -> AutosaazResult<CommissionSettings> {
        let request = ApiRequest::get("get-commission-settings");
        let payload = self.get_cached(ResourceKind::Commission, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Update the marketplace commission percentage
    pub async fn update_commission_percent(&self, percent: f64) -> AutosaazResult<()> {
        let request =
            ApiRequest::post("update-commission-settings").with_body(json!({"percent": percent}));
        self.execute_write(request, &[ResourceKind::Commission.family_pattern()], None)
            .await?;
        Ok(())
    }
}
