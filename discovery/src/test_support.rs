//! Test utilities for the discovery crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::geo::Coordinates;
use crate::domain::map_screen::ScreenSleeper;
use crate::domain::ports::{
    CallbackName, DetailError, InitError, LoadError, LocationError, LocationSource, MapSurface,
    MountTarget, NearbySearchRequest, PlaceDetail, PlaceDetailsRequest, PlacesProvider,
    PositionOptions, RawPlace, SdkLoader, SearchError, SurfaceFactory, SurfaceOptions,
};
use crate::domain::api_key::ApiKey;
use crate::outbound::surface::InMemorySurface;

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test double mutex poisoned"),
    }
}

/// A fixed instant used across tests: Wednesday 2026-03-04 18:00 UTC.
pub fn reference_instant() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 4, 18, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("reference instant is valid"),
    }
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Sleeper that returns immediately and records each requested pause.
#[derive(Default)]
pub struct RecordingSleeper(pub Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Pauses requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        lock(&self.0).clone()
    }
}

#[async_trait]
impl ScreenSleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.0).push(duration);
    }
}

/// Build a provider record with sensible defaults.
pub fn sample_place(place_id: &str, name: &str, types: &[&str]) -> RawPlace {
    RawPlace {
        place_id: place_id.to_owned(),
        name: name.to_owned(),
        vicinity: format!("{name} vicinity"),
        location: Coordinates::new(37.77, -122.41),
        rating: Some(4.0),
        user_ratings_total: Some(10),
        opening_hours: None,
        photos: Vec::new(),
        types: types.iter().map(|&tag| tag.to_owned()).collect(),
    }
}

/// Build a detail record matching `place`.
pub fn sample_detail(place: &RawPlace) -> PlaceDetail {
    PlaceDetail {
        place_id: place.place_id.clone(),
        name: place.name.clone(),
        formatted_address: format!("{} full address", place.name),
        formatted_phone_number: Some("(415) 555-0199".to_owned()),
        website: None,
        opening_hours: None,
        utc_offset_minutes: None,
        rating: place.rating,
        user_ratings_total: place.user_ratings_total,
        photos: Vec::new(),
        location: place.location,
        types: place.types.clone(),
    }
}

/// Places provider answering from a script and recording every request.
#[derive(Default)]
pub struct ScriptedPlacesProvider {
    searches: Mutex<VecDeque<Result<Vec<RawPlace>, SearchError>>>,
    details: Mutex<HashMap<String, Result<PlaceDetail, DetailError>>>,
    search_requests: Mutex<Vec<NearbySearchRequest>>,
    detail_requests: Mutex<Vec<PlaceDetailsRequest>>,
}

impl ScriptedPlacesProvider {
    /// Provider answering searches in order; exhausted scripts find nothing.
    pub fn with_searches(searches: Vec<Result<Vec<RawPlace>, SearchError>>) -> Self {
        Self {
            searches: Mutex::new(searches.into()),
            ..Self::default()
        }
    }

    /// Script the detail answer for one place id.
    pub fn with_detail(self, place_id: &str, detail: Result<PlaceDetail, DetailError>) -> Self {
        lock(&self.details).insert(place_id.to_owned(), detail);
        self
    }

    /// Search requests received so far.
    pub fn search_requests(&self) -> Vec<NearbySearchRequest> {
        lock(&self.search_requests).clone()
    }

    /// Number of search calls.
    pub fn search_calls(&self) -> usize {
        lock(&self.search_requests).len()
    }

    /// Number of detail calls.
    pub fn detail_calls(&self) -> usize {
        lock(&self.detail_requests).len()
    }
}

#[async_trait]
impl PlacesProvider for ScriptedPlacesProvider {
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, SearchError> {
        lock(&self.search_requests).push(request.clone());
        lock(&self.searches).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn place_details(
        &self,
        request: &PlaceDetailsRequest,
    ) -> Result<PlaceDetail, DetailError> {
        lock(&self.detail_requests).push(request.clone());
        lock(&self.details)
            .get(&request.place_id)
            .cloned()
            .unwrap_or_else(|| Err(DetailError::provider_rejected("NOT_FOUND")))
    }
}

/// SDK loader that counts attempts and answers from a script after a delay.
pub struct CountingSdkLoader {
    outcomes: Mutex<VecDeque<Result<(), LoadError>>>,
    delay: Duration,
    calls: AtomicUsize,
    callbacks: Mutex<Vec<CallbackName>>,
}

impl CountingSdkLoader {
    /// Loader answering with `outcomes` in order, then succeeding.
    pub fn new(outcomes: Vec<Result<(), LoadError>>, delay: Duration) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            delay,
            calls: AtomicUsize::new(0),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Loader that always succeeds immediately.
    pub fn succeeding() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    /// Number of underlying load attempts.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Callback names used by each attempt.
    pub fn callbacks(&self) -> Vec<CallbackName> {
        lock(&self.callbacks).clone()
    }
}

#[async_trait]
impl SdkLoader for CountingSdkLoader {
    async fn load(&self, _key: &ApiKey, callback: &CallbackName) -> Result<(), LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.callbacks).push(callback.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        lock(&self.outcomes).pop_front().unwrap_or(Ok(()))
    }
}

/// Location source answering from a script and recording request options.
#[derive(Default)]
pub struct ScriptedLocationSource {
    outcomes: Mutex<VecDeque<Result<Coordinates, LocationError>>>,
    requests: Mutex<Vec<PositionOptions>>,
    stall: bool,
}

impl ScriptedLocationSource {
    /// Source answering with `outcomes` in order; exhausted scripts report
    /// the position as unavailable.
    pub fn new(outcomes: Vec<Result<Coordinates, LocationError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    /// Source that never answers.
    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::default()
        }
    }

    /// Options received so far.
    pub fn requests(&self) -> Vec<PositionOptions> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl LocationSource for ScriptedLocationSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        lock(&self.requests).push(*options);
        if self.stall {
            std::future::pending::<()>().await;
        }
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(LocationError::position_unavailable()))
    }
}

/// Surface factory whose mount target appears after a number of attempts.
pub struct DelayedMountFactory {
    missing_attempts: usize,
    calls: AtomicUsize,
}

impl DelayedMountFactory {
    /// Factory reporting the target missing for the first `missing_attempts`
    /// calls.
    pub fn new(missing_attempts: usize) -> Self {
        Self {
            missing_attempts,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of create calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SurfaceFactory for DelayedMountFactory {
    async fn create(
        &self,
        target: &MountTarget,
        options: &SurfaceOptions,
    ) -> Result<Box<dyn MapSurface>, InitError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.missing_attempts {
            return Err(InitError::target_missing(target.as_str()));
        }
        Ok(Box::new(InMemorySurface::new(options)))
    }
}
