//! Dispute operations

use crate::client::ApiClient;
use crate::types::Dispute;
use autosaaz_core::cache::{CacheKey, ResourceKind};
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

fn detail_key(id: &str) -> CacheKey {
    CacheKey::new("get-dispute-detail", [("id", id)])
}

impl ApiClient {
    /// List disputes, paginated
    pub async fn list_disputes(&self, page: u32) -> AutosaazResult<Vec<Dispute>> {
        let request = ApiRequest::get("get-disputes").with_query("page", page);
        let payload = self.get_cached(ResourceKind::Disputes, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single dispute
    pub async fn get_dispute(&self, id: &str) -> AutosaazResult<Dispute> {
        let request = ApiRequest::get("get-dispute-detail").with_query("id", id);
        let payload = self.get_cached(ResourceKind::Disputes, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Resolve a dispute with a final decision.
    ///
    /// Resolution moves the linked order forward, so orders are invalidated
    /// alongside the dispute family.
    pub async fn resolve_dispute(&self, id: &str, resolution: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("resolve-dispute")
            .with_body(json!({"id": id, "resolution": resolution}));
        self.execute_write(
            request,
            &[
                ResourceKind::Disputes.family_pattern(),
                ResourceKind::Orders.family_pattern(),
            ],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }

    /// Escalate a dispute to a senior reviewer
    pub async fn escalate_dispute(&self, id: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("escalate-dispute").with_body(json!({"id": id}));
        self.execute_write(
            request,
            &[ResourceKind::Disputes.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }
}
