//! CMS page operations

use crate::client::ApiClient;
use crate::types::CmsPage;
use autosaaz_core::cache::{CacheKey, ResourceKind};
use autosaaz_core::error::AutosaazResult;
use autosaaz_core::http::ApiRequest;
use serde_json::json;

fn detail_key(slug: &str) -> CacheKey {
    CacheKey::new("get-cms-page-detail", [("slug", slug)])
}

impl ApiClient {
    /// List CMS content pages
    pub async fn list_cms_pages(&self) -> AutosaazResult<Vec<CmsPage>> {
        let request = ApiRequest::get("get-cms-pages");
        let payload = self.get_cached(ResourceKind::CmsPages, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch a single page by slug
    pub async fn get_cms_page(&self, slug: &str) -> AutosaazResult<CmsPage> {
        let request = ApiRequest::get("get-cms-page-detail").with_query("slug", slug);
        let payload = self.get_cached(ResourceKind::CmsPages, request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Replace a page's title and content
    pub async fn update_cms_page(
        &self,
        slug: &str,
        title: &str,
        content: &str,
    ) -> AutosaazResult<()> {
        let request = ApiRequest::post("update-cms-page")
            .with_body(json!({"slug": slug, "title": title, "content": content}));
        self.execute_write(
            request,
            &[ResourceKind::CmsPages.family_pattern()],
            Some(&detail_key(slug)),
        )
        .await?;
        Ok(())
    }
}
