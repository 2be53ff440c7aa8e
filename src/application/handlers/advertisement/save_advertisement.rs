//! SaveAdvertisementHandler - create or update an advertisement.

use std::sync::Arc;

use crate::domain::advertisement::{
    Advertisement, AdvertisementCreated, AdvertisementDraft, AdvertisementUpdated,
};
use crate::domain::foundation::{CommandMetadata, DomainError, SerializableDomainEvent};
use crate::ports::{AdvertisementRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct SaveAdvertisementCommand {
    pub draft: AdvertisementDraft,
}

#[derive(Debug, Clone)]
pub struct SaveAdvertisementResult {
    pub advertisement: Advertisement,
    pub created: bool,
}

/// Upsert keyed on `draft.id`; a missing or unknown id creates.
pub struct SaveAdvertisementHandler {
    repository: Arc<dyn AdvertisementRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SaveAdvertisementHandler {
    pub fn new(
        repository: Arc<dyn AdvertisementRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SaveAdvertisementCommand,
        metadata: CommandMetadata,
    ) -> Result<SaveAdvertisementResult, DomainError> {
        let existing = match cmd.draft.id {
            Some(id) => self.repository.find_by_id(&id).await?,
            None => None,
        };

        let (advertisement, envelope, created) = match existing {
            Some(mut advertisement) => {
                let previous = advertisement.clone();
                advertisement.apply(cmd.draft);
                let envelope = AdvertisementUpdated::new(&advertisement, &previous).to_envelope()?;
                (advertisement, envelope, false)
            }
            None => {
                let id = cmd.draft.id.unwrap_or_default();
                let advertisement = Advertisement::new(id, cmd.draft);
                let envelope = AdvertisementCreated::new(&advertisement).to_envelope()?;
                (advertisement, envelope, true)
            }
        };

        self.repository.save(&advertisement).await?;
        self.event_publisher
            .publish(envelope.with_correlation_id(metadata.correlation_id()))
            .await?;

        tracing::info!(
            advertisement_id = %advertisement.id(),
            created,
            "Advertisement saved"
        );
        Ok(SaveAdvertisementResult {
            advertisement,
            created,
        })
    }
}
