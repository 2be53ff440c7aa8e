//! Advertisement rotation engine for one display.
//!
//! Drives a [`RotationState`] with two independent tasks:
//!
//! - the countdown, one step per tick, restarted whenever the ad set changes
//! - the reconciliation refetch, on a fixed period
//!
//! Ad events pushed by the hub trigger an extra refetch through
//! [`AdRotationEngine::on_advertisement_event`].
//!
//! View increments and refetch failures are logged and swallowed; the
//! rotation never stops because of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde_json::Value;

use crate::domain::advertisement::{
    LayoutMode, LayoutTracker, RotationPhase, RotationState, DEFAULT_REST_SECS,
};
use crate::domain::foundation::{AdvertisementId, AirportCode, Timestamp};
use crate::ports::{ActiveAdvertisements, DisplayApi};

use super::scheduled_task::ScheduledTask;

/// Invoked once per actual layout change.
pub type LayoutCallback = Arc<dyn Fn(LayoutMode) + Send + Sync>;

/// Engine timing.
#[derive(Debug, Clone)]
pub struct RotationSettings {
    /// Rest between two plays of a lone ad, in ticks.
    pub rest_secs: u32,
    pub refetch_period: Duration,
    /// Length of one countdown step.
    pub tick: Duration,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            rest_secs: DEFAULT_REST_SECS,
            refetch_period: Duration::from_secs(60),
            tick: Duration::from_secs(1),
        }
    }
}

/// Read-only view of the engine, for UI and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSnapshot {
    pub phase: RotationPhase,
    pub current: Option<AdvertisementId>,
    pub time_left: u32,
    pub eligible: Vec<AdvertisementId>,
    pub emergency_mode: bool,
    pub layout: Option<LayoutMode>,
}

impl RotationSnapshot {
    pub fn is_resting(&self) -> bool {
        self.phase == RotationPhase::Resting
    }
}

struct EngineState {
    rotation: RotationState,
    layout: LayoutTracker,
    emergency_mode: bool,
}

/// What a state change asks the engine to do once the lock is released.
#[derive(Default)]
struct Effects {
    started: Option<AdvertisementId>,
    layout: Option<LayoutMode>,
}

pub struct AdRotationEngine {
    api: Arc<dyn DisplayApi>,
    airport: AirportCode,
    settings: RotationSettings,
    state: Mutex<EngineState>,
    on_layout: Option<LayoutCallback>,
    running: AtomicBool,
    countdown: Mutex<Option<ScheduledTask>>,
    refetch: Mutex<Option<ScheduledTask>>,
}

impl AdRotationEngine {
    pub fn new(api: Arc<dyn DisplayApi>, airport: AirportCode, settings: RotationSettings) -> Self {
        let rotation = RotationState::new(settings.rest_secs);
        Self {
            api,
            airport,
            settings,
            state: Mutex::new(EngineState {
                rotation,
                layout: LayoutTracker::new(),
                emergency_mode: false,
            }),
            on_layout: None,
            running: AtomicBool::new(false),
            countdown: Mutex::new(None),
            refetch: Mutex::new(None),
        }
    }

    /// Register the layout-change callback.
    pub fn with_layout_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(LayoutMode) + Send + Sync + 'static,
    {
        self.on_layout = Some(Arc::new(callback));
        self
    }

    pub fn airport(&self) -> &AirportCode {
        &self.airport
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the eligible set and start both timers.
    ///
    /// Calling `start` on a running engine restarts it.
    pub async fn start(self: &Arc<Self>) {
        self.stop();
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(airport = %self.airport, "Starting ad rotation");

        self.refresh().await;

        let weak = Arc::downgrade(self);
        let task = ScheduledTask::every("ad-refetch", self.settings.refetch_period, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(engine) => {
                        engine.refresh().await;
                        true
                    }
                    None => false,
                }
            }
        });
        *lock(&self.refetch) = Some(task);
    }

    /// Cancel both timers. The last state stays readable.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let countdown = lock(&self.countdown).take();
        let refetch = lock(&self.refetch).take();
        if countdown.is_some() || refetch.is_some() {
            tracing::info!(airport = %self.airport, "Stopped ad rotation");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inputs
    // ─────────────────────────────────────────────────────────────────────────

    /// Refetch the eligible set now. Failures keep the current rotation.
    pub async fn refresh(self: &Arc<Self>) {
        match self.api.active_advertisements(&self.airport).await {
            Ok(active) => self.apply(active),
            Err(e) => {
                tracing::warn!(airport = %self.airport, error = %e, "Advertisement refetch failed");
            }
        }
    }

    /// React to a pushed `advertisement:*` payload.
    ///
    /// Payloads that clearly target other airports are ignored; anything
    /// else schedules a refetch.
    pub fn on_advertisement_event(self: &Arc<Self>, payload: &Value) {
        if !self.is_running() || !concerns_airport(payload, &self.airport) {
            return;
        }
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.refresh().await });
    }

    /// Replace the eligible set with a fetch result.
    pub fn apply(self: &Arc<Self>, active: ActiveAdvertisements) {
        let now = Timestamp::now();
        let (effects, playing) = {
            let mut state = lock(&self.state);
            let was_emergency = state.emergency_mode;
            state.emergency_mode = active.emergency_mode;

            let started = if active.emergency_mode {
                if !was_emergency {
                    tracing::warn!(airport = %self.airport, "Emergency mode: advertisements suspended");
                }
                state.rotation.clear();
                None
            } else {
                // The server checked the window at request time; an ad may
                // have expired since.
                let ads = active
                    .advertisements
                    .into_iter()
                    .filter(|ad| ad.is_active() && ad.is_in_window(now))
                    .collect();
                state.rotation.replace(ads)
            };

            let layout = {
                let mode = state.rotation.layout_mode();
                state.layout.observe(mode)
            };
            (Effects { started, layout }, !state.rotation.is_idle())
        };

        if !playing {
            lock(&self.countdown).take();
        } else if effects.started.is_some() {
            self.restart_countdown();
        }
        self.run_effects(effects);
    }

    /// Advance the rotation by one step.
    pub fn tick(self: &Arc<Self>) {
        let effects = {
            let mut state = lock(&self.state);
            let started = state.rotation.tick();
            let mode = state.rotation.layout_mode();
            Effects {
                started,
                layout: state.layout.observe(mode),
            }
        };
        self.run_effects(effects);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> RotationSnapshot {
        let state = lock(&self.state);
        RotationSnapshot {
            phase: state.rotation.phase(),
            current: state.rotation.current().map(|ad| ad.id()),
            time_left: state.rotation.time_left(),
            eligible: state.rotation.ads().iter().map(|ad| ad.id()).collect(),
            emergency_mode: state.emergency_mode,
            layout: state.layout.current(),
        }
    }

    pub fn is_resting(&self) -> bool {
        lock(&self.state).rotation.is_resting()
    }

    pub fn current_ad(&self) -> Option<AdvertisementId> {
        lock(&self.state).rotation.current().map(|ad| ad.id())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn restart_countdown(self: &Arc<Self>) {
        let mut countdown = lock(&self.countdown);
        // Cancel before the replacement starts.
        countdown.take();
        if !self.is_running() {
            return;
        }
        let weak: Weak<Self> = Arc::downgrade(self);
        *countdown = Some(ScheduledTask::every(
            "ad-countdown",
            self.settings.tick,
            move || {
                let weak = weak.clone();
                async move {
                    match weak.upgrade() {
                        Some(engine) => {
                            engine.tick();
                            true
                        }
                        None => false,
                    }
                }
            },
        ));
    }

    fn run_effects(&self, effects: Effects) {
        if let Some(id) = effects.started {
            tracing::debug!(airport = %self.airport, advertisement_id = %id, "Playing advertisement");
            let api = Arc::clone(&self.api);
            tokio::spawn(async move {
                if let Err(e) = api.record_view(&id).await {
                    tracing::warn!(advertisement_id = %id, error = %e, "Failed to record view");
                }
            });
        }
        if let Some(mode) = effects.layout {
            tracing::debug!(airport = %self.airport, layout = %mode, "Layout changed");
            if let Some(callback) = &self.on_layout {
                callback(mode);
            }
        }
    }
}

impl Drop for AdRotationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whether an `advertisement:*` payload may affect this airport.
fn concerns_airport(payload: &Value, airport: &AirportCode) -> bool {
    let lists_airport = |key: &str, source: &Value| {
        source
            .get(key)
            .and_then(Value::as_array)
            .map(|codes| codes.iter().any(|c| c.as_str() == Some(airport.as_str())))
    };

    if let Some(ad) = payload.get("advertisement") {
        let everywhere = |source: &Value, key: &str| {
            source.get(key).and_then(Value::as_bool) == Some(true)
        };
        if everywhere(ad, "showOnAllAirports") || everywhere(payload, "previousShowOnAllAirports")
        {
            return true;
        }
        let now_scoped = lists_airport("airports", ad).unwrap_or(true);
        let was_scoped = lists_airport("previousAirports", payload).unwrap_or(false);
        return now_scoped || was_scoped;
    }
    match payload.get("airports").and_then(Value::as_array) {
        // Deleted ads: an empty scope was global.
        Some(codes) if codes.is_empty() => true,
        Some(_) => lists_airport("airports", payload).unwrap_or(true),
        None => true,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advertisement::test_support::{ad, draft};
    use crate::domain::advertisement::{Advertisement, DisplayMode};
    use crate::domain::flight::{Flight, FlightType};
    use crate::ports::DisplayApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct StubApi {
        active: Mutex<Vec<Advertisement>>,
        emergency: AtomicBool,
        failing: AtomicBool,
        views: AtomicUsize,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl DisplayApi for StubApi {
        async fn active_advertisements(
            &self,
            _airport: &AirportCode,
        ) -> Result<ActiveAdvertisements, DisplayApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(DisplayApiError::Request("down".to_string()));
            }
            Ok(ActiveAdvertisements {
                success: true,
                advertisements: self.active.lock().unwrap().clone(),
                emergency_mode: self.emergency.load(Ordering::SeqCst),
            })
        }

        async fn record_view(&self, _id: &AdvertisementId) -> Result<(), DisplayApiError> {
            self.views.fetch_add(1, Ordering::SeqCst);
            Err(DisplayApiError::Rejected)
        }

        async fn flights(
            &self,
            _airport: &AirportCode,
            _flight_type: Option<FlightType>,
        ) -> Result<Vec<Flight>, DisplayApiError> {
            Ok(Vec::new())
        }
    }

    fn cdg() -> AirportCode {
        AirportCode::new("CDG").unwrap()
    }

    fn engine_with(api: Arc<StubApi>, layouts: Arc<Mutex<Vec<LayoutMode>>>) -> Arc<AdRotationEngine> {
        Arc::new(
            AdRotationEngine::new(api, cdg(), RotationSettings::default())
                .with_layout_callback(move |mode| layouts.lock().unwrap().push(mode)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_layout_fires_even_without_ads() {
        let api = Arc::new(StubApi::default());
        let layouts = Arc::new(Mutex::new(Vec::new()));
        let engine = engine_with(api.clone(), layouts.clone());

        engine.start().await;
        engine.refresh().await;
        engine.refresh().await;

        assert_eq!(*layouts.lock().unwrap(), vec![LayoutMode::NoAd]);
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn layout_follows_display_mode_changes_only() {
        let api = Arc::new(StubApi::default());
        let half = ad("half", 2);
        let mut full_draft = draft("full", 2);
        full_draft.display_mode = DisplayMode::FullScreen;
        let full = Advertisement::new(AdvertisementId::new(), full_draft);
        let also_half = ad("also-half", 2);
        *api.active.lock().unwrap() = vec![half, also_half, full];

        let layouts = Arc::new(Mutex::new(Vec::new()));
        let engine = engine_with(api, layouts.clone());
        engine.start().await;
        tokio::time::sleep(Duration::from_millis(6500)).await;

        // half(2s) -> also-half(2s) -> full(2s) -> half
        assert_eq!(
            *layouts.lock().unwrap(),
            vec![
                LayoutMode::HalfScreen,
                LayoutMode::FullScreen,
                LayoutMode::HalfScreen
            ]
        );
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn emergency_empties_rotation_and_stops_countdown() {
        let api = Arc::new(StubApi::default());
        *api.active.lock().unwrap() = vec![ad("a", 5)];
        let engine = engine_with(api.clone(), Arc::new(Mutex::new(Vec::new())));
        engine.start().await;
        assert!(engine.current_ad().is_some());

        api.emergency.store(true, Ordering::SeqCst);
        engine.refresh().await;

        let snapshot = engine.snapshot();
        assert!(snapshot.emergency_mode);
        assert!(snapshot.eligible.is_empty());
        assert_eq!(snapshot.phase, RotationPhase::Idle);
        assert!(lock(&engine.countdown).is_none());
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_failure_keeps_rotation() {
        let api = Arc::new(StubApi::default());
        let only = ad("a", 5);
        *api.active.lock().unwrap() = vec![only.clone()];
        let engine = engine_with(api.clone(), Arc::new(Mutex::new(Vec::new())));
        engine.start().await;

        api.failing.store(true, Ordering::SeqCst);
        engine.refresh().await;

        assert_eq!(engine.current_ad(), Some(only.id()));
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn expired_ads_are_dropped_client_side() {
        let api = Arc::new(StubApi::default());
        let mut expired = draft("expired", 5);
        expired.end_date = Some(Timestamp::now().minus_minutes(1));
        *api.active.lock().unwrap() =
            vec![Advertisement::new(AdvertisementId::new(), expired)];

        let engine = engine_with(api, Arc::new(Mutex::new(Vec::new())));
        engine.start().await;

        assert!(engine.snapshot().eligible.is_empty());
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn view_failures_do_not_stop_rotation() {
        let api = Arc::new(StubApi::default());
        *api.active.lock().unwrap() = vec![ad("a", 1), ad("b", 1)];
        let engine = engine_with(api.clone(), Arc::new(Mutex::new(Vec::new())));
        engine.start().await;

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(api.views.load(Ordering::SeqCst), 4);
        assert!(engine.current_ad().is_some());
        engine.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_both_timers() {
        let api = Arc::new(StubApi::default());
        *api.active.lock().unwrap() = vec![ad("a", 2), ad("b", 2)];
        let engine = engine_with(api.clone(), Arc::new(Mutex::new(Vec::new())));
        engine.start().await;
        engine.stop();

        let before = engine.snapshot();
        let fetches = api.fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(engine.snapshot(), before);
        assert_eq!(api.fetches.load(Ordering::SeqCst), fetches);
    }

    #[test]
    fn payload_scope_detection() {
        let cdg = cdg();
        let global = json!({"advertisement": {"showOnAllAirports": true, "airports": []}});
        let elsewhere = json!({"advertisement": {"showOnAllAirports": false, "airports": ["ORY"]}});
        let moved_away = json!({
            "advertisement": {"showOnAllAirports": false, "airports": ["ORY"]},
            "previousAirports": ["CDG"]
        });
        let narrowed_from_global = json!({
            "advertisement": {"showOnAllAirports": false, "airports": ["ORY"]},
            "previousAirports": [],
            "previousShowOnAllAirports": true
        });
        let deleted_here = json!({"airports": ["CDG"]});
        let deleted_global = json!({"airports": []});

        assert!(concerns_airport(&global, &cdg));
        assert!(!concerns_airport(&elsewhere, &cdg));
        assert!(concerns_airport(&moved_away, &cdg));
        assert!(concerns_airport(&narrowed_from_global, &cdg));
        assert!(concerns_airport(&deleted_here, &cdg));
        assert!(concerns_airport(&deleted_global, &cdg));
        assert!(!concerns_airport(&json!({"airports": ["NCE"]}), &cdg));
    }
}
