//! Advertisement repository port.

use async_trait::async_trait;

use crate::domain::advertisement::Advertisement;
use crate::domain::foundation::{AdvertisementId, DomainError, Timestamp};

/// Repository port for advertisements and the emergency override flag.
#[async_trait]
pub trait AdvertisementRepository: Send + Sync {
    /// Insert or replace an advertisement.
    async fn save(&self, advertisement: &Advertisement) -> Result<(), DomainError>;

    /// Find an advertisement by its ID.
    async fn find_by_id(&self, id: &AdvertisementId)
        -> Result<Option<Advertisement>, DomainError>;

    /// Count one play atomically and return the updated record.
    ///
    /// Returns `None` if the advertisement doesn't exist.
    async fn record_view(
        &self,
        id: &AdvertisementId,
        at: Timestamp,
    ) -> Result<Option<Advertisement>, DomainError>;

    /// All advertisements, in creation order.
    async fn list(&self) -> Result<Vec<Advertisement>, DomainError>;

    /// Remove an advertisement. Removing an unknown id is a no-op.
    async fn delete(&self, id: &AdvertisementId) -> Result<(), DomainError>;

    /// Whether the airport-wide emergency override is set.
    async fn emergency_mode(&self) -> Result<bool, DomainError>;

    /// Set or clear the emergency override.
    async fn set_emergency_mode(&self, enabled: bool) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertisement_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AdvertisementRepository) {}
    }
}
