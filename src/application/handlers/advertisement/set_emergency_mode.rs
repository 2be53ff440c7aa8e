//! SetEmergencyModeHandler - the global ad kill switch.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::AdvertisementRepository;

#[derive(Debug, Clone, Copy)]
pub struct SetEmergencyModeCommand {
    pub enabled: bool,
}

pub struct SetEmergencyModeHandler {
    repository: Arc<dyn AdvertisementRepository>,
}

impl SetEmergencyModeHandler {
    pub fn new(repository: Arc<dyn AdvertisementRepository>) -> Self {
        Self { repository }
    }

    /// Returns the previous setting.
    pub async fn handle(&self, cmd: SetEmergencyModeCommand) -> Result<bool, DomainError> {
        let previous = self.repository.emergency_mode().await?;
        self.repository.set_emergency_mode(cmd.enabled).await?;
        if previous != cmd.enabled {
            tracing::warn!(enabled = cmd.enabled, "Advertisement emergency mode changed");
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAdvertisementRepository;

    #[tokio::test]
    async fn toggles_and_reports_previous() {
        let repo = Arc::new(InMemoryAdvertisementRepository::new());
        let handler = SetEmergencyModeHandler::new(repo.clone());

        assert!(!handler.handle(SetEmergencyModeCommand { enabled: true }).await.unwrap());
        assert!(repo.emergency_mode().await.unwrap());
        assert!(handler.handle(SetEmergencyModeCommand { enabled: false }).await.unwrap());
    }
}
