//! Advertisement aggregate and its eligibility rules.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::domain::foundation::{AdvertisementId, AirportCode, Timestamp};

use super::LayoutMode;

/// Kind of media an advertisement plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Screen area an advertisement occupies while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    HalfScreen,
    FullScreen,
}

impl DisplayMode {
    pub fn layout(&self) -> LayoutMode {
        match self {
            DisplayMode::HalfScreen => LayoutMode::HalfScreen,
            DisplayMode::FullScreen => LayoutMode::FullScreen,
        }
    }
}

/// Admin-supplied advertisement fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementDraft {
    #[serde(default)]
    pub id: Option<AdvertisementId>,
    pub title: String,
    pub media_type: MediaType,
    pub media_url: String,
    /// Seconds on screen per play.
    pub duration: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub start_date: Timestamp,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub show_on_all_airports: bool,
    #[serde(default)]
    pub airports: Vec<AirportCode>,
    #[serde(default)]
    pub max_views: Option<u64>,
    #[serde(default)]
    pub max_diffusions_per_day: Option<u32>,
}

fn default_true() -> bool {
    true
}

/// Advertisement aggregate.
///
/// Mutated by administrators; displays only read it, apart from the view
/// counters which are incremented best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    id: AdvertisementId,
    title: String,
    media_type: MediaType,
    media_url: String,
    duration: u32,
    priority: i32,
    display_mode: DisplayMode,
    is_active: bool,
    start_date: Timestamp,
    #[serde(default)]
    end_date: Option<Timestamp>,
    #[serde(default)]
    show_on_all_airports: bool,
    #[serde(default)]
    airports: Vec<AirportCode>,
    #[serde(default)]
    max_views: Option<u64>,
    #[serde(default)]
    max_diffusions_per_day: Option<u32>,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    diffusions_today: u32,
    #[serde(default)]
    diffusion_day: Option<NaiveDate>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Advertisement {
    pub fn new(id: AdvertisementId, draft: AdvertisementDraft) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: draft.title,
            media_type: draft.media_type,
            media_url: draft.media_url,
            duration: draft.duration,
            priority: draft.priority,
            display_mode: draft.display_mode,
            is_active: draft.is_active,
            start_date: draft.start_date,
            end_date: draft.end_date,
            show_on_all_airports: draft.show_on_all_airports,
            airports: draft.airports,
            max_views: draft.max_views,
            max_diffusions_per_day: draft.max_diffusions_per_day,
            views: 0,
            diffusions_today: 0,
            diffusion_day: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace admin-editable fields, keeping counters and creation time.
    pub fn apply(&mut self, draft: AdvertisementDraft) {
        self.title = draft.title;
        self.media_type = draft.media_type;
        self.media_url = draft.media_url;
        self.duration = draft.duration;
        self.priority = draft.priority;
        self.display_mode = draft.display_mode;
        self.is_active = draft.is_active;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.show_on_all_airports = draft.show_on_all_airports;
        self.airports = draft.airports;
        self.max_views = draft.max_views;
        self.max_diffusions_per_day = draft.max_diffusions_per_day;
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> AdvertisementId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Seconds on screen per play, never less than one.
    pub fn duration_secs(&self) -> u32 {
        self.duration.max(1)
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn shows_on_all_airports(&self) -> bool {
        self.show_on_all_airports
    }

    pub fn airports(&self) -> &[AirportCode] {
        &self.airports
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Eligibility
    // ─────────────────────────────────────────────────────────────────────────

    /// `now` falls within `[start_date, end_date)`; a missing end is open.
    pub fn is_in_window(&self, now: Timestamp) -> bool {
        if now.is_before(&self.start_date) {
            return false;
        }
        match self.end_date {
            Some(end) => now.is_before(&end),
            None => true,
        }
    }

    pub fn is_scoped_to(&self, airport: &AirportCode) -> bool {
        self.show_on_all_airports || self.airports.contains(airport)
    }

    /// True once total views or today's diffusions reach their ceiling.
    pub fn quota_exhausted(&self, now: Timestamp) -> bool {
        if let Some(max) = self.max_views {
            if self.views >= max {
                return true;
            }
        }
        if let Some(max) = self.max_diffusions_per_day {
            if self.diffusions_on(now.utc_date()) >= max {
                return true;
            }
        }
        false
    }

    /// Whether this ad may rotate on the given airport's displays.
    ///
    /// The emergency override is a global flag and is checked by the caller.
    pub fn is_eligible(&self, airport: &AirportCode, now: Timestamp) -> bool {
        self.is_active
            && self.is_in_window(now)
            && self.is_scoped_to(airport)
            && !self.quota_exhausted(now)
    }

    fn diffusions_on(&self, day: NaiveDate) -> u32 {
        if self.diffusion_day == Some(day) {
            self.diffusions_today
        } else {
            0
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Count one play. The per-day counter restarts on a new UTC day.
    pub fn record_view(&mut self, now: Timestamp) {
        let today = now.utc_date();
        self.diffusions_today = self.diffusions_on(today).saturating_add(1);
        self.diffusion_day = Some(today);
        self.views = self.views.saturating_add(1);
    }

    /// Topics to notify about this ad; empty means global.
    pub fn scoped_airports(&self) -> Vec<AirportCode> {
        if self.show_on_all_airports {
            Vec::new()
        } else {
            self.airports.clone()
        }
    }
}

/// Rotation order: priority descending, then oldest first.
pub fn rotation_order(a: &Advertisement, b: &Advertisement) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn cdg() -> AirportCode {
        AirportCode::new("CDG").unwrap()
    }

    #[test]
    fn fresh_ad_is_eligible_everywhere() {
        let ad = ad("promo", 5);
        assert!(ad.is_eligible(&cdg(), Timestamp::now()));
    }

    #[test]
    fn inactive_ad_is_not_eligible() {
        let mut d = draft("promo", 5);
        d.is_active = false;
        let ad = Advertisement::new(AdvertisementId::new(), d);
        assert!(!ad.is_eligible(&cdg(), Timestamp::now()));
    }

    #[test]
    fn window_is_half_open() {
        let now = Timestamp::now();
        let mut d = draft("promo", 5);
        d.start_date = now;
        d.end_date = Some(now.plus_minutes(10));
        let ad = Advertisement::new(AdvertisementId::new(), d);

        assert!(!ad.is_in_window(now.minus_minutes(1)));
        assert!(ad.is_in_window(now));
        assert!(ad.is_in_window(now.plus_minutes(9)));
        assert!(!ad.is_in_window(now.plus_minutes(10)));
    }

    #[test]
    fn explicit_scope_matches_listed_airports_only() {
        let mut d = draft("promo", 5);
        d.show_on_all_airports = false;
        d.airports = vec![cdg()];
        let ad = Advertisement::new(AdvertisementId::new(), d);

        assert!(ad.is_scoped_to(&cdg()));
        assert!(!ad.is_scoped_to(&AirportCode::new("ORY").unwrap()));
        assert_eq!(ad.scoped_airports(), vec![cdg()]);
    }

    #[test]
    fn all_airports_scope_routes_globally() {
        assert!(ad("promo", 5).scoped_airports().is_empty());
    }

    #[test]
    fn max_views_exhausts_quota() {
        let mut d = draft("promo", 5);
        d.max_views = Some(2);
        let mut ad = Advertisement::new(AdvertisementId::new(), d);
        let now = Timestamp::now();

        ad.record_view(now);
        assert!(ad.is_eligible(&cdg(), now));
        ad.record_view(now);
        assert!(!ad.is_eligible(&cdg(), now));
    }

    #[test]
    fn daily_diffusions_reset_on_new_day() {
        let mut d = draft("promo", 5);
        d.max_diffusions_per_day = Some(1);
        let mut ad = Advertisement::new(AdvertisementId::new(), d);
        let today = Timestamp::now();

        ad.record_view(today);
        assert!(ad.quota_exhausted(today));
        assert!(!ad.quota_exhausted(today.plus_days(1)));

        ad.record_view(today.plus_days(1));
        assert_eq!(ad.views(), 2);
        assert!(ad.quota_exhausted(today.plus_days(1)));
    }

    #[test]
    fn duration_is_at_least_one_second() {
        assert_eq!(ad("zero", 0).duration_secs(), 1);
    }

    #[test]
    fn apply_keeps_counters() {
        let mut ad = ad("promo", 5);
        ad.record_view(Timestamp::now());
        ad.apply(draft("renamed", 8));

        assert_eq!(ad.title(), "renamed");
        assert_eq!(ad.duration_secs(), 8);
        assert_eq!(ad.views(), 1);
    }

    #[test]
    fn rotation_order_prefers_priority_then_age() {
        let older = ad("older", 5);
        let newer = ad("newer", 5);
        let mut d = draft("urgent", 5);
        d.priority = 10;
        let urgent = Advertisement::new(AdvertisementId::new(), d);

        let mut ads = vec![newer.clone(), older.clone(), urgent.clone()];
        ads.sort_by(rotation_order);
        assert_eq!(ads[0].id(), urgent.id());
        assert!(ads[1].created_at() <= ads[2].created_at());
    }

    #[test]
    fn serializes_camel_case_with_kebab_display_mode() {
        let json = serde_json::to_value(ad("promo", 5)).unwrap();
        assert_eq!(json["displayMode"], "half-screen");
        assert_eq!(json["showOnAllAirports"], true);
        assert_eq!(json["mediaType"], "image");
    }
}
