//! Payment operations

use crate::client::ApiClient;
use crate::types::Payment;
use autosaaz_core::cache::ResourceKind;
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

impl ApiClient {
    /// List escrowed payments, paginated
    pub async fn list_payments(&self, page: u32) -> AutosaazResult<Vec<Payment>> {
        let request = ApiRequest::get("get-payments").with_query("page", page);
        let payload = self.get_cached(ResourceKind::Payments, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Release a held payment to the garage.
    ///
    /// Releasing changes the linked order's state too, so both families are
    /// invalidated.
    pub async fn release_payment(&self, id: &str) -> AutosaazResult<()> {
        let request = ApiRequest::post("release-payment").with_body(json!({"id": id}));
        self.execute_write(
            request,
            &[
                ResourceKind::Payments.family_pattern(),
                ResourceKind::Orders.family_pattern(),
            ],
            None,
        )
        .await?;
        Ok(())
    }
}
