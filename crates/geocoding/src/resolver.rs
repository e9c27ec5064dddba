//! Debounced location search and current-position resolution
//!
//! Keystrokes call [`LocationResolver::search`]; each call replaces the
//! pending debounce timer, and only the most recently issued query may
//! publish suggestions. Results are delivered through a
//! [`tokio::sync::watch`] channel so any number of views can follow them.

use crate::config::ResolverConfig;
use crate::error::{GeocodingResult, LocationError};
use crate::position::PositionSource;
use crate::provider::GeocodingProvider;
use crate::types::Suggestion;
use savemate_geo::Coordinate;
use savemate_telemetry::{metrics, Timer};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Monotonic token identifying one `search` call
pub type RequestId = u64;

/// Lifecycle of the latest search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Nothing searched yet, or cleared
    Idle,
    /// Waiting for the quiet period to elapse
    Debouncing,
    /// Request sent to the provider
    Loading,
    /// Suggestions published
    Ready,
    /// Provider failed; suggestions are empty
    Degraded,
}

/// Suggestion state visible to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionState {
    /// Request that last touched this state
    pub request_id: RequestId,
    /// Trimmed query text of that request
    pub query: String,
    /// Where that request is in its lifecycle
    pub status: SearchStatus,
    /// Current suggestions, in provider order
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionState {
    fn idle(request_id: RequestId) -> Self {
        Self {
            request_id,
            query: String::new(),
            status: SearchStatus::Idle,
            suggestions: Vec::new(),
        }
    }

    /// Whether no work is outstanding for this request
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            SearchStatus::Idle | SearchStatus::Ready | SearchStatus::Degraded
        )
    }
}

/// A device position with a display label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    /// Device position
    pub coordinate: Coordinate,
    /// Place name, or the formatted coordinate when no name is known
    pub label: String,
    /// Set when reverse lookup failed or found nothing
    pub label_is_fallback: bool,
}

impl ResolvedLocation {
    fn named(coordinate: Coordinate, label: String) -> Self {
        Self {
            coordinate,
            label,
            label_is_fallback: false,
        }
    }

    fn fallback(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: coordinate.to_string(),
            label_is_fallback: true,
        }
    }
}

/// Turns typed text or the device position into coordinates and labels
pub struct LocationResolver {
    provider: Arc<dyn GeocodingProvider>,
    config: ResolverConfig,
    latest: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: Arc<watch::Sender<SuggestionState>>,
}

impl LocationResolver {
    /// Create a resolver over `provider`
    pub fn new(provider: Arc<dyn GeocodingProvider>, config: ResolverConfig) -> Self {
        let (state, _) = watch::channel(SuggestionState::idle(0));
        Self {
            provider,
            config,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    /// Resolver configuration
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Follow suggestion state changes
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current suggestion state
    #[must_use]
    pub fn current(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// Start a debounced search for `query`
    ///
    /// Queries shorter than the minimum publish an empty result immediately
    /// and never reach the provider. Otherwise the previous pending timer is
    /// cancelled and a new one started; a response that arrives after a newer
    /// `search` call is dropped. Must be called within a Tokio runtime.
    pub fn search(&self, query: &str) -> RequestId {
        let query = query.trim().to_string();

        // Held across id allocation and publish so ids reach the channel in order
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        if query.chars().count() < self.config.min_query_chars {
            debug!(request_id = id, "Query too short, skipping lookup");
            self.state.send_replace(SuggestionState {
                request_id: id,
                query,
                status: SearchStatus::Ready,
                suggestions: Vec::new(),
            });
            return id;
        }

        self.state.send_modify(|s| {
            s.request_id = id;
            s.query.clone_from(&query);
            s.status = SearchStatus::Debouncing;
        });

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.latest);
        let debounce = self.config.debounce;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != id {
                return;
            }

            // Detached: a newer search cancels the timer, not the request
            tokio::spawn(async move {
                state.send_if_modified(|s| {
                    if s.request_id != id {
                        return false;
                    }
                    s.status = SearchStatus::Loading;
                    true
                });

                debug!(request_id = id, query = %query, "Sending geocoding lookup");
                let timer = Timer::start("geocoding.forward_ms");
                let result = provider.forward(&query).await;
                drop(timer);

                apply_result(&state, id, result);
            });
        }));

        id
    }

    /// Wait until request `id` has settled or been superseded
    pub async fn settled(&self, id: RequestId) -> SuggestionState {
        let mut rx = self.state.subscribe();
        let result = rx
            .wait_for(|s| s.request_id > id || (s.request_id == id && s.is_settled()))
            .await
            .map(|s| s.clone());
        match result {
            Ok(state) => state,
            Err(_) => self.current(),
        }
    }

    /// Cancel any pending search and reset to idle
    pub fn clear(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = pending.take() {
            timer.abort();
        }
        self.state.send_replace(SuggestionState::idle(id));
    }

    /// Look up `query` once, without debounce, returning the best match
    ///
    /// Used for explicit submissions such as `--near "Warsaw"`. Short queries
    /// resolve to `None` without a provider call.
    pub async fn resolve_query(&self, query: &str) -> GeocodingResult<Option<Suggestion>> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_chars {
            return Ok(None);
        }
        let suggestions = self.provider.forward(query).await?;
        Ok(suggestions.into_iter().next())
    }

    /// Current device position plus a reverse-geocoded label
    ///
    /// Fails only when the position itself is unavailable or denied. A failed
    /// or empty reverse lookup degrades to the formatted coordinate as label.
    pub async fn resolve_current_position(
        &self,
        source: &dyn PositionSource,
    ) -> Result<ResolvedLocation, LocationError> {
        let coordinate = source.current_position().await?;

        let location = match self.provider.reverse(&coordinate).await {
            Ok(Some(label)) if !label.trim().is_empty() => {
                ResolvedLocation::named(coordinate, label.trim().to_string())
            }
            Ok(_) => {
                debug!(%coordinate, "No place name for position");
                ResolvedLocation::fallback(coordinate)
            }
            Err(e) => {
                warn!(%coordinate, error = %e, "Reverse geocoding failed, using coordinate label");
                metrics().increment("geocoding.reverse_fallback");
                ResolvedLocation::fallback(coordinate)
            }
        };

        Ok(location)
    }
}

impl Drop for LocationResolver {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

fn apply_result(
    state: &watch::Sender<SuggestionState>,
    id: RequestId,
    result: GeocodingResult<Vec<Suggestion>>,
) {
    let (status, suggestions) = match result {
        Ok(suggestions) => (SearchStatus::Ready, suggestions),
        Err(e) => {
            warn!(request_id = id, error = %e, "Geocoding lookup failed, showing no suggestions");
            metrics().increment("geocoding.degraded");
            (SearchStatus::Degraded, Vec::new())
        }
    };

    let applied = state.send_if_modified(|s| {
        if s.request_id != id {
            return false;
        }
        s.status = status;
        s.suggestions = suggestions;
        true
    });

    if !applied {
        debug!(request_id = id, "Dropping superseded geocoding response");
        metrics().increment("geocoding.stale_dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodingError;
    use crate::position::{DeniedPosition, StaticPosition};
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;

    enum Reverse {
        Label(&'static str),
        Empty,
        Fail,
    }

    struct FakeProvider {
        calls: Mutex<Vec<String>>,
        delays: HashMap<&'static str, Duration>,
        reverse: Reverse,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                delays: HashMap::new(),
                reverse: Reverse::Label("Warsaw, Poland"),
            }
        }

        fn with_delay(mut self, query: &'static str, delay: Duration) -> Self {
            self.delays.insert(query, delay);
            self
        }

        fn with_reverse(mut self, reverse: Reverse) -> Self {
            self.reverse = reverse;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeocodingProvider for FakeProvider {
        async fn forward(&self, query: &str) -> GeocodingResult<Vec<Suggestion>> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if query == "fail" {
                return Err(GeocodingError::provider(503, "unavailable"));
            }
            Ok(vec![Suggestion {
                label: format!("{query} result"),
                coordinate: Coordinate::new(52.2297, 21.0122).unwrap(),
                components: BTreeMap::new(),
            }])
        }

        async fn reverse(&self, _coordinate: &Coordinate) -> GeocodingResult<Option<String>> {
            match self.reverse {
                Reverse::Label(label) => Ok(Some(label.to_string())),
                Reverse::Empty => Ok(Some("  ".to_string())),
                Reverse::Fail => Err(GeocodingError::RateLimited),
            }
        }
    }

    fn resolver(provider: &Arc<FakeProvider>) -> LocationResolver {
        LocationResolver::new(provider.clone(), ResolverConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_call_provider() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        for query in ["", "a", "ab", "  ab  "] {
            let id = resolver.search(query);
            let state = resolver.current();
            assert_eq!(state.request_id, id);
            assert_eq!(state.status, SearchStatus::Ready);
            assert!(state.suggestions.is_empty());
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_issues_single_lookup() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        resolver.search("w");
        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.search("wa");
        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.search("war");
        tokio::time::sleep(Duration::from_millis(200)).await;
        let id = resolver.search("wars");

        let state = resolver.settled(id).await;
        assert_eq!(provider.calls(), vec!["wars"]);
        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.suggestions[0].label, "wars result");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abc_keystrokes_coalesce() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        resolver.search("a");
        resolver.search("ab");
        let id = resolver.search("abc");

        resolver.settled(id).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(provider.calls(), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_waits_for_quiet_period() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        resolver.search("krakow");
        assert_eq!(resolver.current().status, SearchStatus::Debouncing);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(provider.calls().is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(provider.calls(), vec!["krakow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let provider = Arc::new(
            FakeProvider::new()
                .with_delay("warsaw", Duration::from_secs(2))
                .with_delay("warszawa", Duration::from_millis(100)),
        );
        let resolver = resolver(&provider);

        let first = resolver.search("warsaw");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(resolver.current().status, SearchStatus::Loading);

        let second = resolver.search("warszawa");
        let state = resolver.settled(second).await;
        assert_eq!(state.suggestions[0].label, "warszawa result");

        // Slow response for the first query lands now
        tokio::time::sleep(Duration::from_secs(3)).await;
        let state = resolver.current();
        assert!(second > first);
        assert_eq!(state.request_id, second);
        assert_eq!(state.suggestions[0].label, "warszawa result");
        assert_eq!(provider.calls(), vec!["warsaw", "warszawa"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_supersedes_in_flight_lookup() {
        let provider = Arc::new(FakeProvider::new().with_delay("gdansk", Duration::from_secs(1)));
        let resolver = resolver(&provider);

        resolver.search("gdansk");
        tokio::time::sleep(Duration::from_millis(600)).await;
        resolver.search("g");

        tokio::time::sleep(Duration::from_secs(2)).await;
        let state = resolver.current();
        assert_eq!(state.query, "g");
        assert!(state.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_degrades() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        let id = resolver.search("fail");
        let state = resolver.settled(id).await;
        assert_eq!(state.status, SearchStatus::Degraded);
        assert!(state.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_published_results() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);
        let mut rx = resolver.subscribe();

        resolver.search("poznan");
        let state = rx
            .wait_for(|s| s.status == SearchStatus::Ready)
            .await
            .unwrap()
            .clone();
        assert_eq!(state.query, "poznan");
        assert_eq!(state.suggestions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_search() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        resolver.search("lodz city");
        resolver.clear();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(provider.calls().is_empty());
        assert_eq!(resolver.current().status, SearchStatus::Idle);
    }

    #[tokio::test]
    async fn test_resolve_query_returns_best_match() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        let best = resolver.resolve_query(" Warsaw ").await.unwrap().unwrap();
        assert_eq!(best.label, "Warsaw result");
        assert!(resolver.resolve_query("Wa").await.unwrap().is_none());
        assert_eq!(provider.calls(), vec!["Warsaw"]);
    }

    #[tokio::test]
    async fn test_current_position_with_label() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);
        let here = Coordinate::new(52.2297, 21.0122).unwrap();

        let location = resolver
            .resolve_current_position(&StaticPosition::at(here))
            .await
            .unwrap();
        assert_eq!(location.coordinate, here);
        assert_eq!(location.label, "Warsaw, Poland");
        assert!(!location.label_is_fallback);
    }

    #[tokio::test]
    async fn test_current_position_reverse_failure_falls_back() {
        let here = Coordinate::new(52.2297, 21.0122).unwrap();

        for reverse in [Reverse::Fail, Reverse::Empty] {
            let provider = Arc::new(FakeProvider::new().with_reverse(reverse));
            let resolver = resolver(&provider);
            let location = resolver
                .resolve_current_position(&StaticPosition::at(here))
                .await
                .unwrap();
            assert_eq!(location.coordinate, here);
            assert_eq!(location.label, "52.2297, 21.0122");
            assert!(location.label_is_fallback);
        }
    }

    #[tokio::test]
    async fn test_current_position_errors() {
        let provider = Arc::new(FakeProvider::new());
        let resolver = resolver(&provider);

        assert!(matches!(
            resolver
                .resolve_current_position(&StaticPosition::unavailable())
                .await,
            Err(LocationError::GeolocationUnavailable)
        ));
        assert!(matches!(
            resolver.resolve_current_position(&DeniedPosition).await,
            Err(LocationError::GeolocationDenied)
        ));
    }
}
