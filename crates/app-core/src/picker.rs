//! Address picker view-model
//!
//! Backs the destination list under the drawer's address input: recent
//! destinations, saved addresses, live search results and the chosen
//! destination.

use crate::search::{KeywordSearch, KEYWORD_DEBOUNCE};
use maps_client::{Address, Coordinate, Geocoder, PlaceSearch, SavedAddress};
use std::sync::Arc;
use std::time::Duration;
use storage::PersistedFavorites;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Picker configuration
#[derive(Debug, Clone)]
pub struct PickerConfig {
    /// Quiet period before a keyword is searched
    pub debounce: Duration,
    /// Whether list selections are added to the history
    pub record_history: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            debounce: KEYWORD_DEBOUNCE,
            record_history: true,
        }
    }
}

impl PickerConfig {
    /// Set the debounce period
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Enable or disable history recording
    pub fn with_record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }
}

/// View-model of the address picker
///
/// # Example
///
/// ```rust,no_run
/// # use app_core::picker::{AddressPickerModel, PickerConfig};
/// # use maps_client::PlaceSearch;
/// # use std::sync::Arc;
/// # use storage::{KvStore, PersistedFavorites};
/// # async fn example(places: Arc<dyn PlaceSearch>) -> Result<(), Box<dyn std::error::Error>> {
/// let favorites = PersistedFavorites::new(Arc::new(KvStore::in_memory()?));
/// let mut picker = AddressPickerModel::new(favorites, places, PickerConfig::default());
///
/// picker.update_keyword("taipei");
/// // ...once results arrive
/// if let Some(address) = picker.select_result(0) {
///     println!("going to {}", address.primary_text());
/// }
/// # Ok(())
/// # }
/// ```
pub struct AddressPickerModel {
    favorites: PersistedFavorites,
    search: KeywordSearch,
    config: PickerConfig,
    history: Vec<Address>,
    destination: Option<Address>,
}

impl AddressPickerModel {
    /// Create a picker and load the history
    pub fn new(
        favorites: PersistedFavorites,
        places: Arc<dyn PlaceSearch>,
        config: PickerConfig,
    ) -> Self {
        let search = KeywordSearch::spawn(places, config.debounce);
        let history = favorites.history();

        Self {
            favorites,
            search,
            config,
            history,
            destination: None,
        }
    }

    /// Past destinations, most recent first
    pub fn history(&self) -> &[Address] {
        &self.history
    }

    /// Re-read the history from storage
    pub fn reload_history(&mut self) {
        self.history = self.favorites.history();
    }

    /// User-named saved addresses
    pub fn saved_addresses(&self) -> Vec<SavedAddress> {
        self.favorites.saved_addresses()
    }

    /// Current search results
    pub fn search_results(&self) -> Vec<Address> {
        self.search.results()
    }

    /// Watch search results as they change
    pub fn subscribe_results(&self) -> watch::Receiver<Vec<Address>> {
        self.search.subscribe()
    }

    /// Feed the search field text
    pub fn update_keyword(&self, keyword: impl Into<String>) {
        self.search.update(keyword);
    }

    /// The chosen destination
    pub fn destination(&self) -> Option<&Address> {
        self.destination.as_ref()
    }

    /// Set or clear the destination without touching the history
    pub fn set_destination(&mut self, destination: Option<Address>) {
        self.destination = destination;
    }

    /// Choose a history row
    pub fn select_history(&mut self, index: usize) -> Option<Address> {
        let address = self.history.get(index)?.clone();
        Some(self.choose(address))
    }

    /// Choose a search result row
    pub fn select_result(&mut self, index: usize) -> Option<Address> {
        let address = self.search.results().get(index)?.clone();
        Some(self.choose(address))
    }

    fn choose(&mut self, address: Address) -> Address {
        if self.config.record_history {
            match self.favorites.add_history(&address) {
                Ok(()) => self.reload_history(),
                Err(e) => warn!("Failed to record history: {}", e),
            }
        }
        debug!("destination chosen: {}", address.primary_text());
        self.destination = Some(address.clone());
        address
    }
}

/// Resolve a tapped or dragged-to coordinate into an address
///
/// Reverse geocoding comes first; when it finds nothing the nearby-place
/// lookup is tried. Failures yield `None` and leave the destination alone.
pub async fn resolve_coordinate(
    geocoder: &dyn Geocoder,
    places: &dyn PlaceSearch,
    coordinate: Coordinate,
) -> Option<Address> {
    match geocoder.reverse_geocode(coordinate).await {
        Ok(Some(address)) => return Some(address.with_coordinate(coordinate)),
        Ok(None) => debug!("no geocode result at {}; trying nearby places", coordinate),
        Err(e) => {
            warn!("Reverse geocoding {} failed: {}", coordinate, e);
            return None;
        }
    }

    match places.nearby(coordinate).await {
        Ok(place) => place.map(|address| address.with_coordinate(coordinate)),
        Err(e) => {
            warn!("Nearby lookup at {} failed: {}", coordinate, e);
            None
        }
    }
}
