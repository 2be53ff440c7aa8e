//! ListActiveAdvertisementsHandler - what a display at one airport may rotate.

use std::sync::Arc;

use crate::domain::advertisement::rotation_order;
use crate::domain::foundation::{AirportCode, DomainError, Timestamp};
use crate::ports::{ActiveAdvertisements, AdvertisementRepository};

#[derive(Debug, Clone)]
pub struct ListActiveAdvertisementsQuery {
    pub airport: AirportCode,
}

pub struct ListActiveAdvertisementsHandler {
    repository: Arc<dyn AdvertisementRepository>,
}

impl ListActiveAdvertisementsHandler {
    pub fn new(repository: Arc<dyn AdvertisementRepository>) -> Self {
        Self { repository }
    }

    /// Eligible ads in rotation order. The emergency override empties the list.
    pub async fn handle(
        &self,
        query: ListActiveAdvertisementsQuery,
    ) -> Result<ActiveAdvertisements, DomainError> {
        if self.repository.emergency_mode().await? {
            return Ok(ActiveAdvertisements {
                success: true,
                advertisements: Vec::new(),
                emergency_mode: true,
            });
        }

        let now = Timestamp::now();
        let mut advertisements: Vec<_> = self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|ad| ad.is_eligible(&query.airport, now))
            .collect();
        advertisements.sort_by(rotation_order);

        Ok(ActiveAdvertisements {
            success: true,
            advertisements,
            emergency_mode: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAdvertisementRepository;
    use crate::domain::advertisement::test_support::draft;
    use crate::domain::advertisement::{Advertisement, AdvertisementDraft};
    use crate::domain::foundation::AdvertisementId;

    fn cdg() -> AirportCode {
        AirportCode::new("CDG").unwrap()
    }

    async fn store(
        repo: &InMemoryAdvertisementRepository,
        build: impl FnOnce(&mut AdvertisementDraft),
    ) -> Advertisement {
        let mut d = draft("ad", 5);
        build(&mut d);
        let ad = Advertisement::new(AdvertisementId::new(), d);
        repo.save(&ad).await.unwrap();
        ad
    }

    #[tokio::test]
    async fn filters_ineligible_and_orders_by_priority() {
        let repo = Arc::new(InMemoryAdvertisementRepository::new());
        let low = store(&repo, |d| d.priority = 1).await;
        let high = store(&repo, |d| d.priority = 9).await;
        store(&repo, |d| d.is_active = false).await;
        store(&repo, |d| {
            d.show_on_all_airports = false;
            d.airports = vec![AirportCode::new("ORY").unwrap()];
        })
        .await;
        store(&repo, |d| d.start_date = Timestamp::now().plus_days(1)).await;

        let handler = ListActiveAdvertisementsHandler::new(repo);
        let active = handler
            .handle(ListActiveAdvertisementsQuery { airport: cdg() })
            .await
            .unwrap();

        let ids: Vec<_> = active.advertisements.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![high.id(), low.id()]);
        assert!(!active.emergency_mode);
    }

    #[tokio::test]
    async fn emergency_mode_empties_the_list() {
        let repo = Arc::new(InMemoryAdvertisementRepository::new());
        store(&repo, |_| {}).await;
        repo.set_emergency_mode(true).await.unwrap();

        let handler = ListActiveAdvertisementsHandler::new(repo);
        let active = handler
            .handle(ListActiveAdvertisementsQuery { airport: cdg() })
            .await
            .unwrap();

        assert!(active.emergency_mode);
        assert!(active.advertisements.is_empty());
    }
}
