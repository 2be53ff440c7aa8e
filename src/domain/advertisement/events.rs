//! Advertisement domain events.
//!
//! Scoped ads notify each airport they target; ads shown on all airports
//! notify the global topic only.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, AdvertisementId, AirportCode, EventId, Timestamp};

use super::Advertisement;

/// Published when an advertisement is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementCreated {
    pub event_id: EventId,
    pub advertisement_id: AdvertisementId,
    pub advertisement: Advertisement,
    pub created_at: Timestamp,
}

impl AdvertisementCreated {
    pub fn new(advertisement: &Advertisement) -> Self {
        Self {
            event_id: EventId::new(),
            advertisement_id: advertisement.id(),
            advertisement: advertisement.clone(),
            created_at: Timestamp::now(),
        }
    }

    fn scoped_airports(&self) -> Vec<AirportCode> {
        self.advertisement.scoped_airports()
    }
}

domain_event!(
    AdvertisementCreated,
    event_type = "advertisement.created",
    aggregate_id = advertisement_id,
    aggregate_type = "Advertisement",
    occurred_at = created_at,
    event_id = event_id,
    airports = scoped_airports
);

/// Published when an advertisement's settings change.
///
/// The previous scope lets airports that were dropped from it learn that the
/// ad no longer concerns them. An ad that was shown everywhere also notifies
/// the global topic, since every display may have been playing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementUpdated {
    pub event_id: EventId,
    pub advertisement_id: AdvertisementId,
    pub advertisement: Advertisement,
    #[serde(default)]
    pub previous_airports: Vec<AirportCode>,
    #[serde(default)]
    pub previous_show_on_all_airports: bool,
    pub updated_at: Timestamp,
}

impl AdvertisementUpdated {
    /// `previous` is the advertisement as stored before the change.
    pub fn new(advertisement: &Advertisement, previous: &Advertisement) -> Self {
        Self {
            event_id: EventId::new(),
            advertisement_id: advertisement.id(),
            advertisement: advertisement.clone(),
            previous_airports: previous.scoped_airports(),
            previous_show_on_all_airports: previous.shows_on_all_airports(),
            updated_at: Timestamp::now(),
        }
    }

    fn scoped_airports(&self) -> Vec<AirportCode> {
        let current = self.advertisement.scoped_airports();
        if current.is_empty() || self.previous_airports.is_empty() {
            return current;
        }
        let mut airports = current;
        for code in &self.previous_airports {
            if !airports.contains(code) {
                airports.push(code.clone());
            }
        }
        airports
    }
}

domain_event!(
    AdvertisementUpdated,
    event_type = "advertisement.updated",
    aggregate_id = advertisement_id,
    aggregate_type = "Advertisement",
    occurred_at = updated_at,
    event_id = event_id,
    airports = scoped_airports
);

/// Published when an advertisement is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementDeleted {
    pub event_id: EventId,
    pub advertisement_id: AdvertisementId,
    #[serde(default)]
    pub airports: Vec<AirportCode>,
    pub deleted_at: Timestamp,
}

impl AdvertisementDeleted {
    pub fn new(advertisement: &Advertisement) -> Self {
        Self {
            event_id: EventId::new(),
            advertisement_id: advertisement.id(),
            airports: advertisement.scoped_airports(),
            deleted_at: Timestamp::now(),
        }
    }

    fn scoped_airports(&self) -> Vec<AirportCode> {
        self.airports.clone()
    }
}

domain_event!(
    AdvertisementDeleted,
    event_type = "advertisement.deleted",
    aggregate_id = advertisement_id,
    aggregate_type = "Advertisement",
    occurred_at = deleted_at,
    event_id = event_id,
    airports = scoped_airports
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advertisement::aggregate::test_support::draft;
    use crate::domain::foundation::SerializableDomainEvent;

    fn code(s: &str) -> AirportCode {
        AirportCode::new(s).unwrap()
    }

    fn scoped_ad(airports: &[&str]) -> Advertisement {
        let mut d = draft("promo", 5);
        d.show_on_all_airports = false;
        d.airports = airports.iter().map(|a| code(a)).collect();
        Advertisement::new(AdvertisementId::new(), d)
    }

    #[test]
    fn global_ad_envelope_has_no_airports() {
        let ad = Advertisement::new(AdvertisementId::new(), draft("promo", 5));
        let envelope = AdvertisementCreated::new(&ad).to_envelope().unwrap();
        assert!(envelope.airports.is_empty());
        assert_eq!(envelope.event_type, "advertisement.created");
    }

    #[test]
    fn update_also_notifies_airports_dropped_from_scope() {
        let before = scoped_ad(&["CDG", "ORY"]);
        let event = AdvertisementUpdated::new(&scoped_ad(&["ORY"]), &before);
        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.airports, vec![code("ORY"), code("CDG")]);
        assert_eq!(envelope.payload["previousShowOnAllAirports"], false);
    }

    #[test]
    fn narrowing_a_global_ad_flags_the_previous_scope() {
        let before = Advertisement::new(AdvertisementId::new(), draft("promo", 5));
        let event = AdvertisementUpdated::new(&scoped_ad(&["ORY"]), &before);
        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.airports, vec![code("ORY")]);
        assert_eq!(envelope.payload["previousShowOnAllAirports"], true);
    }

    #[test]
    fn delete_remembers_scope() {
        let ad = scoped_ad(&["NCE", "LYS"]);
        let envelope = AdvertisementDeleted::new(&ad).to_envelope().unwrap();
        assert_eq!(envelope.airports, vec![code("NCE"), code("LYS")]);
        assert_eq!(envelope.payload["advertisementId"], ad.id().to_string());
    }
}
