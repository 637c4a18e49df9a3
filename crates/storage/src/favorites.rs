//! Persisted favorites: saved, home, company and history addresses
//!
//! Reads never fail. A missing or undecodable value reads as empty and the
//! decode failure is logged, so a corrupted entry cannot block the picker.

use crate::kv::{KvStore, Result};
use maps_client::{Address, SavedAddress};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage keys
pub mod keys {
    /// User-named saved addresses
    pub const SAVED_ADDRESSES: &str = "savedAddresses";
    /// Home address
    pub const HOME_ADDRESS: &str = "homeAddress";
    /// Company address
    pub const COMPANY_ADDRESS: &str = "companyAddress";
    /// Recently chosen destinations, newest first
    pub const HISTORY_ADDRESSES: &str = "historyAddresses";
    /// Whether the terms and conditions were accepted
    pub const TERMS_ACCEPTED: &str = "areTermsAndConditionsAccepted";
}

/// Favorites store over a [`KvStore`]
#[derive(Clone)]
pub struct PersistedFavorites {
    kv: Arc<KvStore>,
}

impl PersistedFavorites {
    /// Create a favorites store
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding unreadable value for {}: {}", key, e);
                None
            }
        }
    }

    /// Every write is flushed before returning
    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.kv.set(key, value)?;
        self.kv.flush()
    }

    fn erase(&self, key: &str) -> Result<()> {
        if self.kv.remove(key)? {
            self.kv.flush()?;
        }
        Ok(())
    }

    fn write_optional(&self, key: &str, address: Option<&Address>) -> Result<()> {
        match address {
            Some(address) => self.write(key, address),
            None => self.erase(key),
        }
    }

    // =========================================================================
    // Saved addresses
    // =========================================================================

    /// All saved addresses in insertion order
    pub fn saved_addresses(&self) -> Vec<SavedAddress> {
        self.read(keys::SAVED_ADDRESSES).unwrap_or_default()
    }

    /// Replace the saved addresses
    pub fn set_saved_addresses(&self, saved: &[SavedAddress]) -> Result<()> {
        self.write(keys::SAVED_ADDRESSES, saved)
    }

    /// Append a saved address
    pub fn add_saved_address(&self, saved: SavedAddress) -> Result<()> {
        let mut all = self.saved_addresses();
        debug!("Saving address {:?}", saved.name);
        all.push(saved);
        self.set_saved_addresses(&all)
    }

    /// Remove every saved address with the given name
    pub fn remove_saved_address(&self, name: &str) -> Result<()> {
        let mut all = self.saved_addresses();
        all.retain(|saved| saved.name != name);
        self.set_saved_addresses(&all)
    }

    /// Forget all saved addresses
    pub fn clear_saved_addresses(&self) -> Result<()> {
        self.erase(keys::SAVED_ADDRESSES)
    }

    // =========================================================================
    // Home and company
    // =========================================================================

    /// The home address, if set
    pub fn home_address(&self) -> Option<Address> {
        self.read(keys::HOME_ADDRESS)
    }

    /// Set or clear the home address
    pub fn set_home_address(&self, address: Option<&Address>) -> Result<()> {
        self.write_optional(keys::HOME_ADDRESS, address)
    }

    /// The company address, if set
    pub fn company_address(&self) -> Option<Address> {
        self.read(keys::COMPANY_ADDRESS)
    }

    /// Set or clear the company address
    pub fn set_company_address(&self, address: Option<&Address>) -> Result<()> {
        self.write_optional(keys::COMPANY_ADDRESS, address)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Past destinations, most recent first
    pub fn history(&self) -> Vec<Address> {
        self.read(keys::HISTORY_ADDRESSES).unwrap_or_default()
    }

    /// Replace the history
    pub fn set_history(&self, history: &[Address]) -> Result<()> {
        self.write(keys::HISTORY_ADDRESSES, history)
    }

    /// Put an address at the front of the history
    ///
    /// The history is neither deduplicated nor capped.
    pub fn add_history(&self, address: &Address) -> Result<()> {
        let mut history = self.history();
        history.insert(0, address.clone());
        self.set_history(&history)
    }

    /// Forget the history
    pub fn clear_history(&self) -> Result<()> {
        self.erase(keys::HISTORY_ADDRESSES)
    }

    // =========================================================================
    // Terms
    // =========================================================================

    /// Whether the user accepted the terms and conditions
    pub fn terms_accepted(&self) -> bool {
        self.read(keys::TERMS_ACCEPTED).unwrap_or(false)
    }

    /// Record whether the terms and conditions were accepted
    pub fn set_terms_accepted(&self, accepted: bool) -> Result<()> {
        self.write(keys::TERMS_ACCEPTED, &accepted)
    }
}
