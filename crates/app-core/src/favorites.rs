//! Home and company editor

use crate::search::{KeywordSearch, KEYWORD_DEBOUNCE};
use maps_client::{Address, PlaceSearch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use storage::{kv, PersistedFavorites};
use tracing::debug;

/// A favorite slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteSlot {
    /// Home
    Home,
    /// Company
    Company,
}

impl FavoriteSlot {
    /// Slot for a favorites-row position in the drawer; other positions open the editor
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FavoriteSlot::Home),
            1 => Some(FavoriteSlot::Company),
            _ => None,
        }
    }

    /// Message id of the slot's label
    pub fn label_id(&self) -> &'static str {
        match self {
            FavoriteSlot::Home => "favorite-home",
            FavoriteSlot::Company => "favorite-company",
        }
    }
}

/// One row of the editor
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteRow {
    /// The slot holds an address
    Set {
        /// Which slot
        slot: FavoriteSlot,
        /// Its address
        address: Address,
    },
    /// The slot is empty
    Unset {
        /// Which slot
        slot: FavoriteSlot,
    },
}

impl FavoriteRow {
    /// Slot of this row
    pub fn slot(&self) -> FavoriteSlot {
        match self {
            FavoriteRow::Set { slot, .. } | FavoriteRow::Unset { slot } => *slot,
        }
    }
}

/// Editor for the home and company favorites
pub struct FavoritesEditor {
    favorites: PersistedFavorites,
    search: KeywordSearch,
}

impl FavoritesEditor {
    /// Create an editor with the default search debounce
    pub fn new(favorites: PersistedFavorites, places: Arc<dyn PlaceSearch>) -> Self {
        Self::with_debounce(favorites, places, KEYWORD_DEBOUNCE)
    }

    /// Create an editor with a custom search debounce
    pub fn with_debounce(
        favorites: PersistedFavorites,
        places: Arc<dyn PlaceSearch>,
        debounce: Duration,
    ) -> Self {
        Self {
            favorites,
            search: KeywordSearch::spawn(places, debounce),
        }
    }

    /// Address stored in a slot
    pub fn address(&self, slot: FavoriteSlot) -> Option<Address> {
        match slot {
            FavoriteSlot::Home => self.favorites.home_address(),
            FavoriteSlot::Company => self.favorites.company_address(),
        }
    }

    /// Home row then company row
    pub fn rows(&self) -> [FavoriteRow; 2] {
        [FavoriteSlot::Home, FavoriteSlot::Company].map(|slot| match self.address(slot) {
            Some(address) => FavoriteRow::Set { slot, address },
            None => FavoriteRow::Unset { slot },
        })
    }

    /// Feed the search field text
    pub fn update_keyword(&self, keyword: impl Into<String>) {
        self.search.update(keyword);
    }

    /// Current search results
    pub fn search_results(&self) -> Vec<Address> {
        self.search.results()
    }

    /// Store an address in a slot
    pub fn assign(&self, slot: FavoriteSlot, address: &Address) -> kv::Result<()> {
        debug!("assigning {} to {:?}", address.primary_text(), slot);
        match slot {
            FavoriteSlot::Home => self.favorites.set_home_address(Some(address)),
            FavoriteSlot::Company => self.favorites.set_company_address(Some(address)),
        }
    }

    /// Store a search result in a slot; `Ok(None)` if the index is stale
    pub fn assign_result(&self, slot: FavoriteSlot, index: usize) -> kv::Result<Option<Address>> {
        let Some(address) = self.search.results().get(index).cloned() else {
            return Ok(None);
        };
        self.assign(slot, &address)?;
        Ok(Some(address))
    }

    /// Empty a slot
    pub fn clear(&self, slot: FavoriteSlot) -> kv::Result<()> {
        match slot {
            FavoriteSlot::Home => self.favorites.set_home_address(None),
            FavoriteSlot::Company => self.favorites.set_company_address(None),
        }
    }
}
