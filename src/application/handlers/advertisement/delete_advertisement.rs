//! DeleteAdvertisementHandler - removes an advertisement.

use std::sync::Arc;

use crate::domain::advertisement::AdvertisementDeleted;
use crate::domain::foundation::{
    AdvertisementId, CommandMetadata, DomainError, ErrorCode, SerializableDomainEvent,
};
use crate::ports::{AdvertisementRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct DeleteAdvertisementCommand {
    pub advertisement_id: AdvertisementId,
}

pub struct DeleteAdvertisementHandler {
    repository: Arc<dyn AdvertisementRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteAdvertisementHandler {
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
        cmd: DeleteAdvertisementCommand,
        metadata: CommandMetadata,
    ) -> Result<AdvertisementDeleted, DomainError> {
        let advertisement = self
            .repository
            .find_by_id(&cmd.advertisement_id)
            .await?
            .ok_or_else(|| not_found(&cmd.advertisement_id))?;

        self.repository.delete(&cmd.advertisement_id).await?;

        let event = AdvertisementDeleted::new(&advertisement);
        self.event_publisher
            .publish(
                event
                    .to_envelope()?
                    .with_correlation_id(metadata.correlation_id()),
            )
            .await?;

        tracing::info!(advertisement_id = %cmd.advertisement_id, "Advertisement deleted");
        Ok(event)
    }
}

pub(super) fn not_found(id: &AdvertisementId) -> DomainError {
    DomainError::new(
        ErrorCode::AdvertisementNotFound,
        format!("Advertisement not found: {}", id),
    )
}
