//! In-memory advertisement store with the global emergency flag.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::advertisement::Advertisement;
use crate::domain::foundation::{AdvertisementId, DomainError, Timestamp};
use crate::ports::AdvertisementRepository;

#[derive(Default)]
struct Store {
    ads: HashMap<AdvertisementId, Advertisement>,
    order: Vec<AdvertisementId>,
    emergency: bool,
}

/// In-memory storage for advertisements
#[derive(Clone, Default)]
pub struct InMemoryAdvertisementRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryAdvertisementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdvertisementRepository for InMemoryAdvertisementRepository {
    async fn save(&self, advertisement: &Advertisement) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let id = advertisement.id();
        if store.ads.insert(id, advertisement.clone()).is_none() {
            store.order.push(id);
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AdvertisementId,
    ) -> Result<Option<Advertisement>, DomainError> {
        Ok(self.store.read().await.ads.get(id).cloned())
    }

    async fn record_view(
        &self,
        id: &AdvertisementId,
        at: Timestamp,
    ) -> Result<Option<Advertisement>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.ads.get_mut(id).map(|advertisement| {
            advertisement.record_view(at);
            advertisement.clone()
        }))
    }

    async fn list(&self) -> Result<Vec<Advertisement>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.ads.get(id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &AdvertisementId) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.ads.remove(id).is_some() {
            store.order.retain(|existing| existing != id);
        }
        Ok(())
    }

    async fn emergency_mode(&self) -> Result<bool, DomainError> {
        Ok(self.store.read().await.emergency)
    }

    async fn set_emergency_mode(&self, enabled: bool) -> Result<(), DomainError> {
        self.store.write().await.emergency = enabled;
        Ok(())
    }
}
