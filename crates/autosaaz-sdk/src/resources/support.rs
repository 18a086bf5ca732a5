//! Support ticket operations

use crate::client::ApiClient;
use crate::types::SupportTicket;
use autosaaz_core::cache::{CacheKey, ResourceKind};
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

fn detail_key(id: &str) -> CacheKey {
    CacheKey::new("get-support-ticket-detail", [("id", id)])
}

impl ApiClient {
    /// List support tickets, paginated
    pub async fn list_support_tickets(&self, page: u32) -> AutosaazResult<Vec<SupportTicket>> {
        let request = ApiRequest::get("get-support-tickets").with_query("page", page);
        let payload = self.get_cached(ResourceKind::SupportTickets, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single support ticket
    pub async fn get_support_ticket(&self, id: &str) -> AutosaazResult<SupportTicket> {
        let request = ApiRequest::get("get-support-ticket-detail").with_query("id", id);
        let payload = self.get_cached(ResourceKind::SupportTickets, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Move a ticket to a new status ("open", "pending", "closed")
    pub async fn update_support_ticket_status(
        &self,
        id: &str,
        status: &str,
    ) -> AutosaazResult<()> {
        let request = ApiRequest::post("update-support-ticket")
            .with_body(json!({"id": id, "status": status}));
        self.execute_write(
            request,
            &[ResourceKind::SupportTickets.family_pattern()],
            Some(&detail_key(id)),
        )
        .await?;
        Ok(())
    }
}
