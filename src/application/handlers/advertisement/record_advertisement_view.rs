//! RecordAdvertisementViewHandler - counts one play.
//!
//! Views are not published: displays catch quota changes on their periodic
//! refetch.

use std::sync::Arc;

use crate::domain::foundation::{AdvertisementId, DomainError, Timestamp};
use crate::ports::AdvertisementRepository;

use super::delete_advertisement::not_found;

#[derive(Debug, Clone)]
pub struct RecordAdvertisementViewCommand {
    pub advertisement_id: AdvertisementId,
}

pub struct RecordAdvertisementViewHandler {
    repository: Arc<dyn AdvertisementRepository>,
}

impl RecordAdvertisementViewHandler {
    pub fn new(repository: Arc<dyn AdvertisementRepository>) -> Self {
        Self { repository }
    }

    /// Returns the new total view count.
    pub async fn handle(&self, cmd: RecordAdvertisementViewCommand) -> Result<u64, DomainError> {
        let advertisement = self
            .repository
            .record_view(&cmd.advertisement_id, Timestamp::now())
            .await?
            .ok_or_else(|| not_found(&cmd.advertisement_id))?;

        tracing::debug!(
            advertisement_id = %cmd.advertisement_id,
            views = advertisement.views(),
            "Advertisement view recorded"
        );
        Ok(advertisement.views())
    }
}
