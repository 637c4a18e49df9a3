//! Map screen
//!
//! Owns the drawer, the picker model, the route planner and the guidance
//! controller, and turns drawer events and map gestures into provider calls.
//! What the map view itself should do comes back as [`ScreenIntent`]s.

use crate::drawer::{DrawerConfig, DrawerController, DrawerEvent, DrawerLayout, Settle};
use crate::ticker::{frame_period, TickerHandle};
use app_core::{
    resolve_coordinate, AddressPickerModel, FavoriteSlot, GuidanceController, PickerConfig,
    RoutePlanner, RouteUpdate,
};
use app_state::{event_channel, EventReceiver, GuidanceTracker};
use i18n::Translator;
use maps_client::{
    Address, Coordinate, CoordinateBounds, DirectionsProvider, Geocoder, GuidanceProvider,
    PlaceSearch, RouteStatus, TravelMode,
};
use parking_lot::Mutex;
use std::sync::Arc;
use storage::PersistedFavorites;
use tracing::{debug, info};

/// Camera center before the first location fix (Taipei)
pub const FALLBACK_CENTER: Coordinate = Coordinate {
    latitude: 25.0330,
    longitude: 121.5654,
};

/// Camera zoom when centering on a point
pub const DEFAULT_ZOOM: f32 = 14.0;

/// External services the screen talks to
#[derive(Clone)]
pub struct MapProviders {
    /// Directions
    pub directions: Arc<dyn DirectionsProvider>,
    /// Reverse geocoding
    pub geocoder: Arc<dyn Geocoder>,
    /// Autocomplete and nearby places
    pub places: Arc<dyn PlaceSearch>,
    /// Turn-by-turn sessions
    pub guidance: Arc<dyn GuidanceProvider>,
}

/// Something the map view should do
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenIntent {
    /// Center the camera
    MoveCamera {
        /// New center
        center: Coordinate,
        /// Zoom level
        zoom: f32,
    },
    /// Fit the camera to a route, leaving room for the collapsed drawer
    FitRoute {
        /// Route bounds
        bounds: CoordinateBounds,
        /// Padding below the route
        bottom_padding: f32,
    },
    /// Draw this route polyline
    DrawRoute(Vec<Coordinate>),
    /// Remove the route polyline
    ClearRoute,
    /// Put the destination marker here
    PlaceMarker(Coordinate),
    /// Remove the destination marker
    ClearMarker,
    /// Show the home/company editor, focused on a slot if given
    OpenFavoritesEditor(Option<FavoriteSlot>),
    /// A guidance session was requested
    GuidanceStarted(RouteStatus),
}

/// The map screen
pub struct MapScreen {
    drawer: Arc<Mutex<DrawerController>>,
    events: EventReceiver<DrawerEvent>,
    ticker: Option<TickerHandle>,
    picker: AddressPickerModel,
    planner: RoutePlanner,
    favorites: PersistedFavorites,
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlaceSearch>,
    guidance: GuidanceController,
    translator: Translator,
    my_location: Option<Coordinate>,
}

impl MapScreen {
    /// Build the screen; must run inside a tokio runtime
    pub fn new(
        providers: MapProviders,
        favorites: PersistedFavorites,
        translator: Translator,
        drawer_config: DrawerConfig,
        picker_config: PickerConfig,
    ) -> Self {
        let (tx, events) = event_channel();
        let drawer = Arc::new(Mutex::new(DrawerController::new(drawer_config, tx)));
        let picker = AddressPickerModel::new(
            favorites.clone(),
            Arc::clone(&providers.places),
            picker_config,
        );
        let guidance =
            GuidanceController::new(providers.guidance, Arc::new(GuidanceTracker::new()));

        Self {
            drawer,
            events,
            ticker: None,
            picker,
            planner: RoutePlanner::new(providers.directions),
            favorites,
            geocoder: providers.geocoder,
            places: providers.places,
            guidance,
            translator,
            my_location: None,
        }
    }

    // =========================================================================
    // Drawer access
    // =========================================================================

    /// Shared drawer
    pub fn drawer(&self) -> Arc<Mutex<DrawerController>> {
        Arc::clone(&self.drawer)
    }

    /// Run `f` on the drawer, then restart the frame ticker if the address
    /// input started a new glide
    pub fn with_drawer<R>(&mut self, f: impl FnOnce(&mut DrawerController) -> R) -> R {
        let (result, restart) = {
            let mut drawer = self.drawer.lock();
            let result = f(&mut drawer);
            (result, drawer.take_convergence_request())
        };

        if restart {
            // Replacing the handle cancels the previous ticker
            self.ticker = Some(TickerHandle::start(frame_period(), Arc::clone(&self.drawer)));
        }
        result
    }

    /// Current drawer layout
    pub fn layout(&self) -> DrawerLayout {
        self.drawer.lock().layout()
    }

    /// Whether the address input is gliding
    pub fn is_animating(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Container bounds are known
    pub fn layout_container(&mut self, height: f32, bottom_inset: f32) {
        self.with_drawer(|d| d.install_metrics(height, bottom_inset));
    }

    /// The screen appeared
    pub fn appear(&mut self) {
        self.with_drawer(|d| d.appear());
    }

    /// Pan started
    pub fn pan_began(&mut self, y: f32) {
        self.with_drawer(|d| d.pan_began(y));
    }

    /// Pan moved
    pub fn pan_changed(&mut self, y: f32) {
        self.with_drawer(|d| d.pan_changed(y));
    }

    /// Pan ended or was cancelled
    pub fn pan_ended(&mut self, velocity_y: f32) -> Option<Settle> {
        self.with_drawer(|d| d.pan_ended(velocity_y))
    }

    /// The drawer move to animate next, if any
    pub fn take_settle(&mut self) -> Option<Settle> {
        self.drawer.lock().take_settle()
    }

    // =========================================================================
    // Models
    // =========================================================================

    /// Picker model
    pub fn picker(&self) -> &AddressPickerModel {
        &self.picker
    }

    /// Route planner
    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    /// Guidance session state
    pub fn guidance_tracker(&self) -> Arc<GuidanceTracker> {
        Arc::clone(self.guidance.tracker())
    }

    /// Translator for labels
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Last known location
    pub fn my_location(&self) -> Option<Coordinate> {
        self.my_location
    }

    /// Where the camera starts
    pub fn initial_camera(&self) -> ScreenIntent {
        ScreenIntent::MoveCamera {
            center: self.my_location.unwrap_or(FALLBACK_CENTER),
            zoom: DEFAULT_ZOOM,
        }
    }

    /// A location fix arrived; the first one centers the camera
    pub fn update_location(&mut self, location: Coordinate) -> Option<ScreenIntent> {
        let first = self.my_location.is_none();
        self.my_location = Some(location);
        self.planner.set_origin(Some(location));

        first.then_some(ScreenIntent::MoveCamera {
            center: location,
            zoom: DEFAULT_ZOOM,
        })
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// A history row was tapped
    pub fn select_history(&mut self, index: usize) -> bool {
        match self.picker.select_history(index) {
            Some(address) => {
                self.with_drawer(|d| d.select_address(address));
                true
            }
            None => false,
        }
    }

    /// A search result row was tapped
    pub fn select_result(&mut self, index: usize) -> bool {
        match self.picker.select_result(index) {
            Some(address) => {
                self.with_drawer(|d| d.select_address(address));
                true
            }
            None => false,
        }
    }

    /// The map was tapped; a resolved place becomes the destination
    pub async fn map_tapped(&mut self, coordinate: Coordinate) -> Vec<ScreenIntent> {
        let mut intents = Vec::new();
        match resolve_coordinate(self.geocoder.as_ref(), self.places.as_ref(), coordinate).await {
            Some(address) => self.show_destination(address, &mut intents).await,
            None => debug!("nothing resolved at {}", coordinate),
        }
        intents
    }

    /// The destination marker was dropped somewhere else
    pub async fn marker_dragged(&mut self, coordinate: Coordinate) -> Vec<ScreenIntent> {
        self.map_tapped(coordinate).await
    }

    /// End the running guidance session
    pub async fn stop_guidance(&mut self) {
        self.guidance.stop().await;
    }

    /// Handle everything the drawer reported since the last call
    pub async fn process_events(&mut self) -> Vec<ScreenIntent> {
        let mut intents = Vec::new();
        while let Some(event) = self.events.try_recv() {
            self.handle(event, &mut intents).await;
        }
        intents
    }

    async fn handle(&mut self, event: DrawerEvent, intents: &mut Vec<ScreenIntent>) {
        debug!("drawer event: {:?}", event);
        match event {
            DrawerEvent::KeywordChanged(keyword) => self.picker.update_keyword(keyword),
            DrawerEvent::DestinationSelected(address) => {
                let coordinate = address.coordinate();
                self.picker.set_destination(Some(address));
                self.planner.set_destination(Some(coordinate));
                intents.push(ScreenIntent::PlaceMarker(coordinate));
                self.refresh_route(intents).await;
            }
            DrawerEvent::DestinationCleared => {
                self.picker.set_destination(None);
                self.picker.update_keyword(String::new());
                self.planner.set_destination(None);
                intents.push(ScreenIntent::ClearMarker);
                self.refresh_route(intents).await;
            }
            DrawerEvent::TravelModeSelected(mode) => self.change_mode(mode, intents).await,
            DrawerEvent::StartRequested(destination) => {
                let status = self.guidance.start(destination, self.planner.mode()).await;
                info!("guidance start: {:?}", status);
                intents.push(ScreenIntent::GuidanceStarted(status));
            }
            DrawerEvent::HomeRequested => self.open_favorite(FavoriteSlot::Home, intents).await,
            DrawerEvent::CompanyRequested => {
                self.open_favorite(FavoriteSlot::Company, intents).await
            }
            DrawerEvent::EditRequested => intents.push(ScreenIntent::OpenFavoritesEditor(None)),
            DrawerEvent::RecenterRequested => intents.push(ScreenIntent::MoveCamera {
                center: self.my_location.unwrap_or(FALLBACK_CENTER),
                zoom: DEFAULT_ZOOM,
            }),
        }
    }

    async fn change_mode(&mut self, mode: TravelMode, intents: &mut Vec<ScreenIntent>) {
        self.planner.set_mode(mode);
        if self.planner.destination().is_some() {
            self.refresh_route(intents).await;
        }
    }

    async fn open_favorite(&mut self, slot: FavoriteSlot, intents: &mut Vec<ScreenIntent>) {
        let address = match slot {
            FavoriteSlot::Home => self.favorites.home_address(),
            FavoriteSlot::Company => self.favorites.company_address(),
        };
        match address {
            Some(address) => self.show_destination(address, intents).await,
            None => intents.push(ScreenIntent::OpenFavoritesEditor(Some(slot))),
        }
    }

    async fn show_destination(&mut self, address: Address, intents: &mut Vec<ScreenIntent>) {
        let coordinate = address.coordinate();
        self.picker.set_destination(Some(address.clone()));
        self.with_drawer(|d| d.set_destination(address));
        self.planner.set_destination(Some(coordinate));
        intents.push(ScreenIntent::PlaceMarker(coordinate));
        self.refresh_route(intents).await;
    }

    async fn refresh_route(&mut self, intents: &mut Vec<ScreenIntent>) {
        match self.planner.refresh().await {
            RouteUpdate::Drawn(overlay) => {
                let label = overlay.summary.label(&self.translator);
                let bottom_padding = self.drawer.lock().config().collapse_route_height;
                self.with_drawer(|d| d.set_route_info(label));

                intents.push(ScreenIntent::DrawRoute(overlay.path));
                if let Some(bounds) = overlay.bounds {
                    intents.push(ScreenIntent::FitRoute {
                        bounds,
                        bottom_padding,
                    });
                }
            }
            RouteUpdate::Cleared => {
                self.with_drawer(|d| d.clear_route_info());
                intents.push(ScreenIntent::ClearRoute);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawer::DrawerState;
    use async_trait::async_trait;
    use maps_client::{
        Error, GuidanceSession, GuidanceUpdate, Result, Route, RouteRequest,
    };
    use std::time::Duration;
    use storage::KvStore;
    use tokio::sync::mpsc;

    const POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn place(name: &str, latitude: f64) -> Address {
        Address::new(name, "Xinyi District", Coordinate::new(latitude, 121.56))
    }

    /// Every provider at once, with canned answers
    #[derive(Default)]
    struct CannedMaps {
        no_route: bool,
        geocoded: Option<Address>,
        results: Vec<Address>,
        requests: Mutex<Vec<RouteRequest>>,
        sessions: Mutex<Vec<mpsc::Sender<GuidanceUpdate>>>,
    }

    #[async_trait]
    impl DirectionsProvider for CannedMaps {
        async fn directions(&self, request: &RouteRequest) -> Result<Route> {
            self.requests.lock().push(*request);
            if self.no_route {
                return Err(Error::NoRouteFound);
            }
            Ok(Route {
                encoded_polyline: POLYLINE.to_string(),
                distance_meters: 12_345,
                duration_seconds: 3_725,
            })
        }
    }

    #[async_trait]
    impl Geocoder for CannedMaps {
        async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<Option<Address>> {
            Ok(self.geocoded.clone())
        }
    }

    #[async_trait]
    impl PlaceSearch for CannedMaps {
        async fn autocomplete(&self, _keyword: &str) -> Result<Vec<Address>> {
            Ok(self.results.clone())
        }

        async fn nearby(&self, _coordinate: Coordinate) -> Result<Option<Address>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl GuidanceProvider for CannedMaps {
        async fn start(&self, _destination: Coordinate, _mode: TravelMode) -> Result<GuidanceSession> {
            let (session, updates, _stop) = GuidanceSession::channel(4);
            self.sessions.lock().push(updates);
            Ok(session)
        }
    }

    fn screen_with(maps: CannedMaps) -> (MapScreen, Arc<CannedMaps>, PersistedFavorites) {
        let maps = Arc::new(maps);
        let favorites = PersistedFavorites::new(Arc::new(KvStore::in_memory().unwrap()));
        let providers = MapProviders {
            directions: maps.clone(),
            geocoder: maps.clone(),
            places: maps.clone(),
            guidance: maps.clone(),
        };
        let mut screen = MapScreen::new(
            providers,
            favorites.clone(),
            Translator::negotiated(&["en-US"]).unwrap(),
            DrawerConfig::default(),
            PickerConfig::default().with_debounce(Duration::from_millis(10)),
        );
        screen.layout_container(800.0, 0.0);
        screen.appear();
        screen.update_location(Coordinate::new(25.04, 121.55));
        (screen, maps, favorites)
    }

    #[tokio::test]
    async fn test_initial_camera_falls_back() {
        let maps = Arc::new(CannedMaps::default());
        let screen = MapScreen::new(
            MapProviders {
                directions: maps.clone(),
                geocoder: maps.clone(),
                places: maps.clone(),
                guidance: maps,
            },
            PersistedFavorites::new(Arc::new(KvStore::in_memory().unwrap())),
            Translator::negotiated(&["en-US"]).unwrap(),
            DrawerConfig::default(),
            PickerConfig::default(),
        );
        assert_eq!(
            screen.initial_camera(),
            ScreenIntent::MoveCamera {
                center: FALLBACK_CENTER,
                zoom: DEFAULT_ZOOM
            }
        );
    }

    #[tokio::test]
    async fn test_pan_through_screen() {
        let (mut screen, _, _) = screen_with(CannedMaps::default());
        assert_eq!(screen.take_settle().unwrap().state, DrawerState::Expanded);

        screen.pan_began(0.0);
        screen.pan_changed(400.0);
        assert!(screen.layout().progress < 1.0);
        let settle = screen.pan_ended(0.0).unwrap();
        assert_eq!(settle.state, DrawerState::Collapsed);
        assert_eq!(screen.take_settle(), Some(settle));
        assert!(screen.is_animating());
    }

    #[tokio::test]
    async fn test_first_fix_moves_camera_once() {
        let (mut screen, _, _) = screen_with(CannedMaps::default());
        assert_eq!(screen.update_location(Coordinate::new(1.0, 2.0)), None);
        assert_eq!(screen.my_location(), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(screen.planner().origin(), Some(Coordinate::new(1.0, 2.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_appear_animates_connector() {
        let (screen, _, _) = screen_with(CannedMaps::default());
        assert!(screen.is_animating());
        assert_eq!(screen.layout().progress, 1.0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!screen.is_animating());
        assert_eq!(screen.drawer().lock().connector().progress(), 1.0);
    }

    #[tokio::test]
    async fn test_map_tap_draws_route() {
        let (mut screen, maps, _) = screen_with(CannedMaps {
            geocoded: Some(place("Taipei 101", 25.0339)),
            ..Default::default()
        });
        let tapped = Coordinate::new(25.0340, 121.5645);

        let intents = screen.map_tapped(tapped).await;

        assert_eq!(intents[0], ScreenIntent::PlaceMarker(tapped));
        assert!(matches!(intents[1], ScreenIntent::DrawRoute(ref path) if path.len() == 3));
        assert!(matches!(
            intents[2],
            ScreenIntent::FitRoute { bottom_padding, .. } if bottom_padding == 350.0
        ));
        assert_eq!(maps.requests.lock()[0].destination, tapped);

        let drawer = screen.drawer();
        let drawer = drawer.lock();
        assert_eq!(drawer.state(), DrawerState::Collapsed);
        assert_eq!(drawer.route_info(), Some("1 hr 2 min (12 km 345 m)"));
        assert_eq!(drawer.connector().text(), "Taipei 101");
    }

    #[tokio::test]
    async fn test_unresolved_tap_changes_nothing() {
        let (mut screen, maps, _) = screen_with(CannedMaps::default());
        let intents = screen.map_tapped(Coordinate::new(0.0, 0.0)).await;
        assert!(intents.is_empty());
        assert!(screen.picker().destination().is_none());
        assert!(maps.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_directions_clear_route() {
        let (mut screen, _, _) = screen_with(CannedMaps {
            geocoded: Some(place("Nowhere", 10.0)),
            no_route: true,
            ..Default::default()
        });

        let intents = screen.map_tapped(Coordinate::new(10.0, 10.0)).await;
        assert_eq!(intents.last(), Some(&ScreenIntent::ClearRoute));
        assert_eq!(screen.planner().last_status(), Some(RouteStatus::NoRouteFound));
        assert!(screen.drawer().lock().route_info().is_none());
    }

    #[tokio::test]
    async fn test_travel_mode_refreshes_route() {
        let (mut screen, maps, _) = screen_with(CannedMaps {
            geocoded: Some(place("Taipei 101", 25.0339)),
            ..Default::default()
        });
        screen.map_tapped(Coordinate::new(25.0339, 121.56)).await;

        screen.with_drawer(|d| d.select_travel_mode(2));
        screen.process_events().await;

        let requests = maps.requests.lock();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].mode, TravelMode::Driving);
    }

    #[tokio::test]
    async fn test_travel_mode_without_destination_skips_lookup() {
        let (mut screen, maps, _) = screen_with(CannedMaps::default());
        screen.with_drawer(|d| d.select_travel_mode(1));
        assert!(screen.process_events().await.is_empty());
        assert_eq!(screen.planner().mode(), TravelMode::TwoWheeler);
        assert!(maps.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_clear_destination() {
        let (mut screen, _, _) = screen_with(CannedMaps {
            geocoded: Some(place("Taipei 101", 25.0339)),
            ..Default::default()
        });
        screen.map_tapped(Coordinate::new(25.0339, 121.56)).await;

        screen.with_drawer(|d| d.tap_clear_destination());
        let intents = screen.process_events().await;

        assert_eq!(intents, vec![ScreenIntent::ClearMarker, ScreenIntent::ClearRoute]);
        assert!(screen.picker().destination().is_none());
        assert!(screen.planner().destination().is_none());
    }

    #[tokio::test]
    async fn test_unset_favorite_opens_editor() {
        let (mut screen, _, _) = screen_with(CannedMaps::default());
        screen.with_drawer(|d| {
            d.tap_favorite(0);
            d.tap_favorite(5);
        });
        assert_eq!(
            screen.process_events().await,
            vec![
                ScreenIntent::OpenFavoritesEditor(Some(FavoriteSlot::Home)),
                ScreenIntent::OpenFavoritesEditor(None),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_favorite_becomes_destination() {
        let (mut screen, _, favorites) = screen_with(CannedMaps::default());
        let office = place("Office", 25.05);
        favorites.set_company_address(Some(&office)).unwrap();

        screen.with_drawer(|d| d.tap_favorite(1));
        let intents = screen.process_events().await;

        assert_eq!(intents[0], ScreenIntent::PlaceMarker(office.coordinate()));
        assert_eq!(screen.picker().destination(), Some(&office));
        assert_eq!(screen.drawer().lock().destination(), Some(&office));
    }

    #[tokio::test]
    async fn test_start_guidance() {
        let (mut screen, maps, _) = screen_with(CannedMaps {
            geocoded: Some(place("Taipei 101", 25.0339)),
            ..Default::default()
        });
        screen.map_tapped(Coordinate::new(25.0339, 121.56)).await;

        assert!(screen.with_drawer(|d| d.tap_start()));
        let intents = screen.process_events().await;

        assert_eq!(intents, vec![ScreenIntent::GuidanceStarted(RouteStatus::Ok)]);
        assert_eq!(maps.sessions.lock().len(), 1);
        assert!(screen.guidance_tracker().snapshot().await.is_active());

        screen.stop_guidance().await;
        assert!(!screen.guidance_tracker().snapshot().await.is_active());
    }

    #[tokio::test]
    async fn test_recenter() {
        let (mut screen, _, _) = screen_with(CannedMaps::default());
        screen.with_drawer(|d| d.tap_recenter());
        assert_eq!(
            screen.process_events().await,
            vec![ScreenIntent::MoveCamera {
                center: Coordinate::new(25.04, 121.55),
                zoom: DEFAULT_ZOOM,
            }]
        );
    }

    #[tokio::test]
    async fn test_search_and_select_result() {
        let (mut screen, _, favorites) = screen_with(CannedMaps {
            results: vec![place("Din Tai Fung", 25.033)],
            ..Default::default()
        });

        screen.with_drawer(|d| d.edit_keyword("din"));
        screen.process_events().await;

        let mut results = screen.picker().subscribe_results();
        while results.borrow_and_update().is_empty() {
            tokio::time::timeout(Duration::from_secs(1), results.changed())
                .await
                .unwrap()
                .unwrap();
        }

        assert!(screen.select_result(0));
        let intents = screen.process_events().await;
        assert_eq!(
            intents[0],
            ScreenIntent::PlaceMarker(place("Din Tai Fung", 25.033).coordinate())
        );
        assert_eq!(favorites.history(), vec![place("Din Tai Fung", 25.033)]);
        assert!(!screen.select_result(3));
    }
}
