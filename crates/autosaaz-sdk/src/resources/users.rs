//! User account operations

use crate::client::ApiClient;
use crate::types::User;
use autosaaz_core::cache::{CacheKey, ResourceKind};
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

fn detail_key(id: &str) -> CacheKey {
    CacheKey::new("get-user-detail", [("id", id)])
}

impl ApiClient {
    /// List customer accounts, paginated
    pub async fn list_users(&self, page: u32) -> AutosaazResult<Vec<User>> {
        let request = ApiRequest::get("get-users").with_query("page", page);
        let payload = self.get_cached(ResourceKind::Users, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single account
    pub async fn get_user(&self, id: &str) -> AutosaazResult<User> {
        let request = ApiRequest::get("get-user-detail").with_query("id", id);
        let payload = self.get_cached(ResourceKind::Users, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Suspend an account
    pub async fn suspend_user(&self, id: &str, reason: &str) -> AutosaazResult<()> {
        let request =
            ApiRequest::post("suspend-user").with_body(json!({"id": id, "reason": reason}));
        self.execute_write(
            request,
            &[ResourceKind::Users.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }

    /// Lift a suspension
    pub async fn activate_user(&self, id: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("activate-user").with_body(json!({"id": id}));
        self.execute_write(
            request,
            &[ResourceKind::Users.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }
}
