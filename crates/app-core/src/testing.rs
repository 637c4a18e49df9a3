//! Provider doubles shared by the unit tests

use async_trait::async_trait;
use maps_client::{
    Address, Coordinate, DirectionsProvider, Error, Geocoder, GuidanceProvider, GuidanceSession,
    GuidanceUpdate, PlaceSearch, Result, Route, RouteRequest, TravelMode,
};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

pub(crate) fn address(name: &str) -> Address {
    Address::new(name, format!("{name} Road"), Coordinate::new(25.03, 121.56))
}

/// Place search that records every keyword it is asked for
pub(crate) struct FakePlaces {
    queries: Mutex<Vec<String>>,
    results: Vec<Address>,
    nearby: Option<Address>,
    fail: bool,
}

impl FakePlaces {
    pub(crate) fn with_results(results: Vec<Address>) -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            results,
            nearby: None,
            fail: false,
        }
    }

    pub(crate) fn with_nearby(nearby: Option<Address>) -> Self {
        Self {
            nearby,
            ..Self::with_results(Vec::new())
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_results(Vec::new())
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl PlaceSearch for FakePlaces {
    async fn autocomplete(&self, keyword: &str) -> Result<Vec<Address>> {
        self.queries.lock().push(keyword.to_string());
        if self.fail {
            return Err(Error::Internal("search unavailable".to_string()));
        }
        Ok(self.results.clone())
    }

    async fn nearby(&self, _coordinate: Coordinate) -> Result<Option<Address>> {
        if self.fail {
            return Err(Error::Internal("search unavailable".to_string()));
        }
        Ok(self.nearby.clone())
    }
}

mockall::mock! {
    pub Directions {}

    #[async_trait]
    impl DirectionsProvider for Directions {
        async fn directions(&self, request: &RouteRequest) -> Result<Route>;
    }
}

mockall::mock! {
    pub Geo {}

    #[async_trait]
    impl Geocoder for Geo {
        async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>>;
    }
}

/// Guidance provider whose sessions are driven by the test
#[derive(Default)]
pub(crate) struct FakeGuidance {
    updates: Mutex<Option<mpsc::Sender<GuidanceUpdate>>>,
    stop: Mutex<Option<oneshot::Receiver<()>>>,
    fail_with: Mutex<Option<Error>>,
    starts: Mutex<Vec<(Coordinate, TravelMode)>>,
}

impl FakeGuidance {
    pub(crate) fn failing(error: Error) -> Self {
        let fake = Self::default();
        *fake.fail_with.lock() = Some(error);
        fake
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<GuidanceUpdate> {
        self.updates
            .lock()
            .clone()
            .expect("no session was started")
    }

    /// Drop the provider's end of the update channel
    pub(crate) fn close(&self) {
        self.updates.lock().take();
    }

    pub(crate) fn take_stop(&self) -> oneshot::Receiver<()> {
        self.stop.lock().take().expect("no session was started")
    }

    pub(crate) fn starts(&self) -> Vec<(Coordinate, TravelMode)> {
        self.starts.lock().clone()
    }
}

#[async_trait]
impl GuidanceProvider for FakeGuidance {
    async fn start(&self, destination: Coordinate, mode: TravelMode) -> Result<GuidanceSession> {
        self.starts.lock().push((destination, mode));
        if let Some(error) = self.fail_with.lock().take() {
            return Err(error);
        }
        let (session, updates, stop) = GuidanceSession::channel(8);
        *self.updates.lock() = Some(updates);
        *self.stop.lock() = Some(stop);
        Ok(session)
    }
}
