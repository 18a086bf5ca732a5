//! Push notification operations

use crate::client::ApiClient;
use crate::types::{NewNotification, Notification};
use autosaaz_core::cache::ResourceKind;
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;

impl ApiClient {
    /// List previously sent notifications, paginated
    pub async fn list_notifications(&self, page: u32) -> AutosaazResult<Vec<Notification>> {
        let request = ApiRequest::get("get-notifications").with_query("page", page);
        let payload = self.get_cached(ResourceKind::Notifications, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Send a push notification to an audience
    pub async fn send_notification(&self, notification: &NewNotification) -> AutosaazResult<()> {
        let request =
            ApiRequest::post("send-notification").with_body(serde_json::to_value(notification)?);
        self.execute_write(
            request,
            &[ResourceKind::Notifications.family_pattern()],
            None,
        )
        .await?;
        Ok(())
    }
}
