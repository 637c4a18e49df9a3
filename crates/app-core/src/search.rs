//! Debounced keyword search against the place provider
//!
//! Keystrokes go in through [`KeywordSearch::update`]; a background task waits
//! for the keyword to settle, skips repeats of the last searched keyword and
//! publishes results on a watch channel.

use maps_client::{Address, PlaceSearch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet period before a keyword is searched
pub const KEYWORD_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced autocomplete session
///
/// Dropping the search stops its task.
pub struct KeywordSearch {
    keywords: mpsc::UnboundedSender<String>,
    results: watch::Receiver<Vec<Address>>,
    task: JoinHandle<()>,
}

impl KeywordSearch {
    /// Start a search session on the current runtime
    pub fn spawn(places: Arc<dyn PlaceSearch>, debounce: Duration) -> Self {
        let (keywords, keyword_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(Vec::new());
        let task = tokio::spawn(run(places, debounce, keyword_rx, results_tx));

        Self {
            keywords,
            results,
            task,
        }
    }

    /// Feed the latest text of the search field
    pub fn update(&self, keyword: impl Into<String>) {
        let _ = self.keywords.send(keyword.into());
    }

    /// Current results
    pub fn results(&self) -> Vec<Address> {
        self.results.borrow().clone()
    }

    /// Watch results as they change
    pub fn subscribe(&self) -> watch::Receiver<Vec<Address>> {
        self.results.clone()
    }
}

impl Drop for KeywordSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    places: Arc<dyn PlaceSearch>,
    debounce: Duration,
    mut keywords: mpsc::UnboundedReceiver<String>,
    results: watch::Sender<Vec<Address>>,
) {
    let mut last_searched: Option<String> = None;

    while let Some(mut keyword) = keywords.recv().await {
        loop {
            match tokio::time::timeout(debounce, keywords.recv()).await {
                Ok(Some(newer)) => keyword = newer,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        if last_searched.as_deref() == Some(keyword.as_str()) {
            continue;
        }
        last_searched = Some(keyword.clone());

        results.send_replace(Vec::new());
        if keyword.is_empty() {
            continue;
        }

        debug!("searching places for {:?}", keyword);
        match places.autocomplete(&keyword).await {
            Ok(found) => {
                results.send_replace(found);
            }
            Err(e) => warn!("Place search for {:?} failed: {}", keyword, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{address, FakePlaces};

    #[tokio::test(start_paused = true)]
    async fn test_debounce_searches_last_keyword_once() {
        let places = Arc::new(FakePlaces::with_results(vec![address("Taipei 101")]));
        let search = KeywordSearch::spawn(places.clone(), KEYWORD_DEBOUNCE);

        search.update("t");
        search.update("ta");
        search.update("tai");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(places.queries(), vec!["tai".to_string()]);
        assert_eq!(search.results(), vec![address("Taipei 101")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_slower_than_debounce_each_search() {
        let places = Arc::new(FakePlaces::with_results(vec![address("A")]));
        let search = KeywordSearch::spawn(places.clone(), KEYWORD_DEBOUNCE);

        search.update("a");
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.update("ab");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(places.queries(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_keyword_is_skipped() {
        let places = Arc::new(FakePlaces::with_results(vec![address("A")]));
        let search = KeywordSearch::spawn(places.clone(), KEYWORD_DEBOUNCE);

        search.update("cafe");
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.update("caf");
        search.update("cafe");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(places.queries(), vec!["cafe".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_keyword_clears_results() {
        let places = Arc::new(FakePlaces::with_results(vec![address("A")]));
        let search = KeywordSearch::spawn(places.clone(), KEYWORD_DEBOUNCE);

        search.update("a");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(search.results().len(), 1);

        search.update("");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(search.results().is_empty());
        assert_eq!(places.queries(), vec!["a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_error_leaves_results_empty() {
        let places = Arc::new(FakePlaces::failing());
        let search = KeywordSearch::spawn(places.clone(), KEYWORD_DEBOUNCE);

        search.update("anything");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(places.queries().len(), 1);
        assert!(search.results().is_empty());
    }
}
