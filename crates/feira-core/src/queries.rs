// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Offer query layer
//
// Wraps the offer endpoints with the offer cache. Reads consult the cache
// before the network; mutations invalidate the keys they touch. Every call
// gets exactly one retry on failure; only deterministic client-side
// validation failures are exempt.

use crate::cache::{ListKey, ListScope, OfferCache};
use crate::client::ApiClient;
use crate::types::{AppError, Offer, OfferDraft, OfferPageQuery, Page};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The offer endpoints the query layer depends on.
///
/// `ApiClient` is the one production implementation; the seam exists so the
/// cache and invalidation wiring can be exercised without a live backend.
#[async_trait]
pub trait OfferApi: Send + Sync {
    async fn list_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError>;
    async fn my_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError>;
    async fn get_offer(&self, id: i64) -> Result<Offer, AppError>;
    async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer, AppError>;
    async fn update_offer(&self, id: i64, draft: &OfferDraft) -> Result<Offer, AppError>;
    async fn delete_offer(&self, id: i64) -> Result<(), AppError>;
    async fn approve_offer(&self, id: i64) -> Result<Offer, AppError>;
    async fn reject_offer(&self, id: i64, reason: Option<&str>) -> Result<Offer, AppError>;
}

#[async_trait]
impl OfferApi for ApiClient {
    async fn list_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        ApiClient::list_offers(self, query).await
    }

    async fn my_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        ApiClient::my_offers(self, query).await
    }

    async fn get_offer(&self, id: i64) -> Result<Offer, AppError> {
        ApiClient::get_offer(self, id).await
    }

    async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer, AppError> {
        ApiClient::create_offer(self, draft).await
    }

    async fn update_offer(&self, id: i64, draft: &OfferDraft) -> Result<Offer, AppError> {
        ApiClient::update_offer(self, id, draft).await
    }

    async fn delete_offer(&self, id: i64) -> Result<(), AppError> {
        ApiClient::delete_offer(self, id).await
    }

    async fn approve_offer(&self, id: i64) -> Result<Offer, AppError> {
        ApiClient::approve_offer(self, id).await
    }

    async fn reject_offer(&self, id: i64, reason: Option<&str>) -> Result<Offer, AppError> {
        ApiClient::reject_offer(self, id, reason).await
    }
}

/// Cached, retrying access to the offer endpoints
pub struct OfferQueries {
    api: Arc<dyn OfferApi>,
    cache: OfferCache,
}

impl OfferQueries {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_api(client)
    }

    /// Build the query layer over any offer endpoint implementation
    pub fn with_api(api: Arc<dyn OfferApi>) -> Self {
        Self {
            api,
            cache: OfferCache::new(),
        }
    }

    /// Public offer listing, cache-first
    pub async fn list(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        self.list_scoped(ListScope::Public, query).await
    }

    /// The caller's own offers, cache-first
    pub async fn mine(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        self.list_scoped(ListScope::Mine, query).await
    }

    async fn list_scoped(
        &self,
        scope: ListScope,
        query: &OfferPageQuery,
    ) -> Result<Page<Offer>, AppError> {
        let key = ListKey {
            scope,
            query: query.clone(),
        };
        if let Some(page) = self.cache.get_list(&key) {
            tracing::debug!("Serving offer list from cache");
            return Ok(page);
        }

        let page = with_retry(|| async {
            match scope {
                ListScope::Public => self.api.list_offers(query).await,
                ListScope::Mine => self.api.my_offers(query).await,
            }
        })
        .await?;

        self.cache.put_list(key, page.clone());
        Ok(page)
    }

    /// Single offer, cache-first
    pub async fn detail(&self, id: i64) -> Result<Offer, AppError> {
        if let Some(offer) = self.cache.get_detail(id) {
            tracing::debug!("Serving offer {} from cache", id);
            return Ok(offer);
        }

        let offer = with_retry(|| self.api.get_offer(id)).await?;
        self.cache.put_detail(offer.clone());
        Ok(offer)
    }

    /// Create an offer; drops every cached list page
    pub async fn create(&self, draft: &OfferDraft) -> Result<Offer, AppError> {
        let offer = with_retry(|| self.api.create_offer(draft)).await?;
        self.cache.invalidate_lists();
        Ok(offer)
    }

    /// Edit an offer; drops cached lists and that offer's detail entry
    pub async fn update(&self, id: i64, draft: &OfferDraft) -> Result<Offer, AppError> {
        let offer = with_retry(|| self.api.update_offer(id, draft)).await?;
        self.cache.invalidate_lists();
        self.cache.invalidate_detail(id);
        Ok(offer)
    }

    /// Delete an offer; drops cached lists and removes the detail entry
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        with_retry(|| self.api.delete_offer(id)).await?;
        self.cache.invalidate_lists();
        self.cache.invalidate_detail(id);
        Ok(())
    }

    /// Approve a pending offer; drops cached lists and its detail entry
    pub async fn approve(&self, id: i64) -> Result<Offer, AppError> {
        let offer = with_retry(|| self.api.approve_offer(id)).await?;
        self.cache.invalidate_lists();
        self.cache.invalidate_detail(id);
        Ok(offer)
    }

    /// Reject a pending offer; drops cached lists and its detail entry
    pub async fn reject(&self, id: i64, reason: Option<&str>) -> Result<Offer, AppError> {
        let offer = with_retry(|| self.api.reject_offer(id, reason)).await?;
        self.cache.invalidate_lists();
        self.cache.invalidate_detail(id);
        Ok(offer)
    }

    /// Shared cache, exposed for session-level teardown (logout clears it)
    pub fn cache(&self) -> &OfferCache {
        &self.cache
    }
}

/// Run an operation with a single retry on failure.
///
/// Validation failures are deterministic and never retried; everything else
/// gets one more attempt, and the second error is the one reported.
async fn with_retry<T, F, Fut>(op: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(AppError::Validation(message)) => Err(AppError::Validation(message)),
        Err(first) => {
            tracing::debug!("Retrying after error: {}", first);
            op().await
        }
    }
}
