//! Shared state behind the API routes.

use std::sync::Arc;

use crate::application::handlers::{
    ChangeFlightStatusHandler, DeleteAdvertisementHandler, DeleteFlightHandler,
    ListActiveAdvertisementsHandler, ListFlightsHandler, NotifyReferenceChangeHandler,
    RecordAdvertisementViewHandler, RegisterFlightHandler, SaveAdvertisementHandler,
    SetEmergencyModeHandler, UpdateFlightTimesHandler,
};
use crate::ports::{AdvertisementRepository, EventPublisher, FlightRepository};

/// Repositories and the publisher; handlers are built per request.
#[derive(Clone)]
pub struct ApiState {
    pub flight_repository: Arc<dyn FlightRepository>,
    pub advertisement_repository: Arc<dyn AdvertisementRepository>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl ApiState {
    pub fn new(
        flight_repository: Arc<dyn FlightRepository>,
        advertisement_repository: Arc<dyn AdvertisementRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            flight_repository,
            advertisement_repository,
            event_publisher,
        }
    }

    pub fn list_flights_handler(&self) -> ListFlightsHandler {
        ListFlightsHandler::new(self.flight_repository.clone())
    }

    pub fn register_flight_handler(&self) -> RegisterFlightHandler {
        RegisterFlightHandler::new(self.flight_repository.clone(), self.event_publisher.clone())
    }

    pub fn update_flight_times_handler(&self) -> UpdateFlightTimesHandler {
        UpdateFlightTimesHandler::new(self.flight_repository.clone(), self.event_publisher.clone())
    }

    pub fn change_flight_status_handler(&self) -> ChangeFlightStatusHandler {
        ChangeFlightStatusHandler::new(self.flight_repository.clone(), self.event_publisher.clone())
    }

    pub fn delete_flight_handler(&self) -> DeleteFlightHandler {
        DeleteFlightHandler::new(self.flight_repository.clone(), self.event_publisher.clone())
    }

    pub fn list_active_advertisements_handler(&self) -> ListActiveAdvertisementsHandler {
        ListActiveAdvertisementsHandler::new(self.advertisement_repository.clone())
    }

    pub fn record_advertisement_view_handler(&self) -> RecordAdvertisementViewHandler {
        RecordAdvertisementViewHandler::new(self.advertisement_repository.clone())
    }

    pub fn save_advertisement_handler(&self) -> SaveAdvertisementHandler {
        SaveAdvertisementHandler::new(
            self.advertisement_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn delete_advertisement_handler(&self) -> DeleteAdvertisementHandler {
        DeleteAdvertisementHandler::new(
            self.advertisement_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn set_emergency_mode_handler(&self) -> SetEmergencyModeHandler {
        SetEmergencyModeHandler::new(self.advertisement_repository.clone())
    }

    pub fn notify_reference_change_handler(&self) -> NotifyReferenceChangeHandler {
        NotifyReferenceChangeHandler::new(self.event_publisher.clone())
    }
}
