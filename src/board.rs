//! Results board: the state holder the presentation layer owns
//!
//! The board publishes a [`BoardState`] through a `watch` channel. At
//! construction it publishes the cached snapshot (if any) synchronously, so
//! the first paint needs no network round trip. Every [`ResultsBoard::select`]
//! spawns a fetch task that normalizes the response, overwrites the cache on
//! success and publishes a full replacement state.
//!
//! ```text
//!  new() ──► cache.load() ──► state: Ready(Cache) | Idle
//!                                   ▲
//!  select(season, round) ──► spawn ─┴─ fetch ─► normalize ─► cache.save()
//!                                           └─► NoData | Failed
//! ```
//!
//! Fetch tasks are not cancelled or sequenced against each other: when two
//! selections overlap, whichever response completes last is what the board
//! shows. Dropping the board cancels all in-flight fetches.
//!
//! The sort mode lives on the board, not in the published state, because it
//! is a presentation preference: new data keeps the current mode.

use futures::Stream;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cache::ResultCache;
use crate::normalizer::ResultsNormalizer;
use crate::orderer::{OrderedResults, SortMode, order};
use crate::provider::ResultsProvider;
use crate::types::{RaceListing, RaceResultSet, Round, Season};
use crate::{RaceboardError, Result};

/// Where the results currently shown came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Snapshot restored from the cache at startup
    Cache,
    /// Fresh response from the provider
    Feed,
}

/// What the presentation layer should show
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    /// No cached data and no completed fetch yet
    Idle,
    /// A result set is available
    Ready { results: Arc<RaceResultSet>, origin: Origin },
    /// The feed has no results for the selected round
    NoData { season: Season, round: Round, message: String },
    /// The fetch failed
    Failed { season: Season, round: Round, message: String, details: String },
}

impl BoardState {
    pub fn results(&self) -> Option<&Arc<RaceResultSet>> {
        match self {
            BoardState::Ready { results, .. } => Some(results),
            _ => None,
        }
    }

    /// Message to show instead of the table, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            BoardState::Idle => Some("No cached data"),
            BoardState::Ready { .. } => None,
            BoardState::NoData { message, .. } | BoardState::Failed { message, .. } => {
                Some(message)
            }
        }
    }

    fn from_error(season: Season, round: Round, error: &RaceboardError) -> Self {
        let message = error.user_message().to_string();
        if error.is_no_data() {
            BoardState::NoData { season, round, message }
        } else {
            BoardState::Failed { season, round, message, details: error.to_string() }
        }
    }
}

/// Presentation-side holder of the current results and sort mode
pub struct ResultsBoard {
    provider: Arc<dyn ResultsProvider>,
    cache: Arc<dyn ResultCache>,
    normalizer: ResultsNormalizer,
    state_tx: Arc<watch::Sender<BoardState>>,
    state_rx: watch::Receiver<BoardState>,
    sort_mode: SortMode,
    selection: Option<(Season, Round)>,
    cancel: CancellationToken,
}

impl ResultsBoard {
    /// Create a board and publish the cached snapshot, if there is one.
    pub fn new(
        provider: Arc<dyn ResultsProvider>,
        cache: Arc<dyn ResultCache>,
        normalizer: ResultsNormalizer,
    ) -> Self {
        let initial = match cache.load() {
            Some(results) => {
                info!(race = %results.race.race_name, "Showing cached results");
                BoardState::Ready { results: Arc::new(results), origin: Origin::Cache }
            }
            None => {
                debug!("No cached results to show");
                BoardState::Idle
            }
        };
        let (state_tx, state_rx) = watch::channel(initial);

        Self {
            provider,
            cache,
            normalizer,
            state_tx: Arc::new(state_tx),
            state_rx,
            sort_mode: SortMode::Normal,
            selection: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a board and immediately fetch `season`/`round`.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(
        provider: Arc<dyn ResultsProvider>,
        cache: Arc<dyn ResultCache>,
        normalizer: ResultsNormalizer,
        season: Season,
        round: Round,
    ) -> Self {
        let mut board = Self::new(provider, cache, normalizer);
        board.select(season, round);
        board
    }

    /// Fetch another season/round.
    ///
    /// Earlier fetches keep running. The returned handle completes once this
    /// fetch has published its state; it may be dropped.
    pub fn select(&mut self, season: Season, round: Round) -> JoinHandle<()> {
        self.selection = Some((season, round));

        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);
        let normalizer = self.normalizer.clone();
        let state_tx = Arc::clone(&self.state_tx);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(%season, %round, "Fetch cancelled");
                }
                state = Self::fetch_task(provider, cache, normalizer, season, round) => {
                    state_tx.send_replace(state);
                }
            }
        })
    }

    async fn fetch_task(
        provider: Arc<dyn ResultsProvider>,
        cache: Arc<dyn ResultCache>,
        normalizer: ResultsNormalizer,
        season: Season,
        round: Round,
    ) -> BoardState {
        info!(%season, %round, source = %provider.describe(), "Fetching race results");

        let outcome = match provider.fetch_results(season, round).await {
            Ok(body) => normalizer.normalize(&body),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(results) => {
                info!(
                    %season,
                    %round,
                    race = %results.race.race_name,
                    drivers = results.len(),
                    "Race results loaded"
                );
                let results = Arc::new(results);
                Self::save_snapshot(cache, Arc::clone(&results)).await;
                BoardState::Ready { results, origin: Origin::Feed }
            }
            Err(e) if e.is_no_data() => {
                info!(%season, %round, "No results for selected round");
                BoardState::from_error(season, round, &e)
            }
            Err(e) => {
                error!(%season, %round, error = %e, "Failed to load race results");
                BoardState::from_error(season, round, &e)
            }
        }
    }

    /// Cache writes are blocking file I/O, so they run on the blocking pool.
    async fn save_snapshot(cache: Arc<dyn ResultCache>, results: Arc<RaceResultSet>) {
        match tokio::task::spawn_blocking(move || cache.save(&results)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to cache race results"),
            Err(e) => warn!(error = %e, "Cache write task failed"),
        }
    }

    /// Race listing for the season picker.
    pub async fn races(&self, season: Season) -> Result<Vec<RaceListing>> {
        self.provider.fetch_races(season).await
    }

    /// The most recent selection, if any.
    pub fn selection(&self) -> Option<(Season, Round)> {
        self.selection
    }

    /// Current state snapshot.
    pub fn state(&self) -> BoardState {
        self.state_rx.borrow().clone()
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.state_rx.clone()
    }

    /// State changes as a stream, starting with the current state.
    pub fn updates(&self) -> impl Stream<Item = BoardState> + 'static {
        WatchStream::new(self.state_rx.clone())
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// The current results in the current sort mode.
    pub fn view(&self) -> Option<OrderedResults> {
        self.state_rx.borrow().results().map(|results| order(results, self.sort_mode))
    }

    /// Switch between classification and fastest-lap order.
    pub fn toggle_sort(&mut self) -> Option<OrderedResults> {
        self.sort_mode = self.sort_mode.toggled();
        debug!(mode = ?self.sort_mode, "Sort mode toggled");
        self.view()
    }
}

impl Drop for ResultsBoard {
    fn drop(&mut self) {
        debug!("Dropping results board");
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::test_utils::{result_set, sample_result_xml, wrap_results};
    use std::collections::HashMap;
    use tokio::sync::Notify;
    use tokio_stream::StreamExt;

    /// Serves canned bodies per round; each fetch waits for its round's gate.
    struct GatedProvider {
        bodies: HashMap<u32, Result<String>>,
        gates: HashMap<u32, Arc<Notify>>,
    }

    impl GatedProvider {
        fn new() -> Self {
            Self { bodies: HashMap::new(), gates: HashMap::new() }
        }

        fn with_body(mut self, round: u32, body: String) -> Self {
            self.bodies.insert(round, Ok(body));
            self.gates.insert(round, Arc::new(Notify::new()));
            self
        }

        fn with_error(mut self, round: u32, error: RaceboardError) -> Self {
            self.bodies.insert(round, Err(error));
            self.gates.insert(round, Arc::new(Notify::new()));
            self
        }

        fn gate(&self, round: u32) -> Arc<Notify> {
            Arc::clone(&self.gates[&round])
        }
    }

    #[async_trait::async_trait]
    impl ResultsProvider for GatedProvider {
        async fn fetch_results(&self, _season: Season, round: Round) -> Result<String> {
            let Round::Number(round) = round else {
                return Err(RaceboardError::transport("only numbered rounds are served"));
            };
            self.gates[&round].notified().await;
            match &self.bodies[&round] {
                Ok(body) => Ok(body.clone()),
                Err(e) => Err(RaceboardError::transport(e.to_string())),
            }
        }

        async fn fetch_races(&self, _season: Season) -> Result<Vec<RaceListing>> {
            Ok(vec![RaceListing {
                round: 1,
                race_name: "Bahrain Grand Prix".to_string(),
                date: "2023-03-05".to_string(),
            }])
        }

        fn describe(&self) -> String {
            "gated test provider".to_string()
        }
    }

    fn race_xml(winner: (&str, &str)) -> String {
        wrap_results(&[
            sample_result_xml("1", winner.0, winner.1, "Finished"),
            sample_result_xml("2", "Nico", "Hülkenberg", "+1 Lap"),
        ])
    }

    fn board_with(provider: GatedProvider, cache: Arc<MemoryCache>) -> ResultsBoard {
        ResultsBoard::new(Arc::new(provider), cache, ResultsNormalizer::default())
    }

    #[tokio::test]
    async fn cached_snapshot_is_the_first_paint() {
        let cached = result_set(&[("Cached Driver", "1:20.000", "1")]);
        let cache = Arc::new(MemoryCache::with_snapshot(cached.clone()));
        let board = board_with(GatedProvider::new(), cache);

        match board.state() {
            BoardState::Ready { results, origin } => {
                assert_eq!(*results, cached);
                assert_eq!(origin, Origin::Cache);
            }
            other => panic!("expected cached results, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_cache_starts_idle() {
        let board = board_with(GatedProvider::new(), Arc::new(MemoryCache::new()));
        assert_eq!(board.state(), BoardState::Idle);
        assert_eq!(board.state().message(), Some("No cached data"));
        assert!(board.view().is_none());
    }

    #[tokio::test]
    async fn fresh_results_replace_cache_and_are_saved() {
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let gate = provider.gate(1);
        let cache = Arc::new(MemoryCache::with_snapshot(result_set(&[("Old", "N/A", "N/A")])));
        let mut board = board_with(provider, Arc::clone(&cache));

        let handle = board.select(Season::Year(2023), Round::Number(1));
        gate.notify_one();
        handle.await.unwrap();

        let state = board.state();
        assert!(matches!(state, BoardState::Ready { origin: Origin::Feed, .. }));
        let results = state.results().unwrap();
        assert_eq!(results.driver_keys().next(), Some("Max Verstappen"));
        assert_eq!(cache.save_count(), 1);
        assert_eq!(cache.load().as_ref(), Some(results.as_ref()));
    }

    /// Records which thread each save ran on.
    #[derive(Default)]
    struct ThreadRecordingCache {
        save_threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ResultCache for ThreadRecordingCache {
        fn load(&self) -> Option<RaceResultSet> {
            None
        }

        fn save(&self, _results: &RaceResultSet) -> Result<()> {
            self.save_threads.lock().unwrap().push(std::thread::current().id());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn cache_writes_run_off_the_runtime_thread() {
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let gate = provider.gate(1);
        let cache = Arc::new(ThreadRecordingCache::default());
        let mut board =
            ResultsBoard::new(Arc::new(provider), cache.clone(), ResultsNormalizer::default());

        let handle = board.select(Season::Year(2023), Round::Number(1));
        gate.notify_one();
        handle.await.unwrap();

        // The current-thread runtime polls the fetch task on this thread
        let save_threads = cache.save_threads.lock().unwrap().clone();
        assert_eq!(save_threads.len(), 1);
        assert_ne!(save_threads[0], std::thread::current().id());
        assert!(matches!(board.state(), BoardState::Ready { origin: Origin::Feed, .. }));
    }

    #[tokio::test]
    async fn empty_results_are_not_cached() {
        let provider = GatedProvider::new().with_body(4, wrap_results(&[]));
        let gate = provider.gate(4);
        let cache = Arc::new(MemoryCache::new());
        let mut board = board_with(provider, Arc::clone(&cache));

        let handle = board.select(Season::Year(2023), Round::Number(4));
        gate.notify_one();
        handle.await.unwrap();

        assert!(matches!(board.state(), BoardState::NoData { .. }));
        assert_eq!(board.state().message(), Some("No results available for this race"));
        assert_eq!(cache.save_count(), 0);
        assert!(cache.load().is_none());
    }

    #[tokio::test]
    async fn transport_failures_surface_generic_message() {
        let provider =
            GatedProvider::new().with_error(2, RaceboardError::http_status("http://feed", 503));
        let gate = provider.gate(2);
        let cache = Arc::new(MemoryCache::new());
        let mut board = board_with(provider, Arc::clone(&cache));

        let handle = board.select(Season::Year(2023), Round::Number(2));
        gate.notify_one();
        handle.await.unwrap();

        match board.state() {
            BoardState::Failed { message, round, .. } => {
                assert_eq!(message, "Could not retrieve data");
                assert_eq!(round, Round::Number(2));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(cache.save_count(), 0);
    }

    #[tokio::test]
    async fn malformed_documents_are_failures_not_no_data() {
        let provider = GatedProvider::new().with_body(3, "<html>oops</html>".to_string());
        let gate = provider.gate(3);
        let mut board = board_with(provider, Arc::new(MemoryCache::new()));

        let handle = board.select(Season::Year(2023), Round::Number(3));
        gate.notify_one();
        handle.await.unwrap();

        assert!(matches!(board.state(), BoardState::Failed { .. }));
    }

    #[tokio::test]
    async fn last_completed_fetch_wins() {
        let provider = GatedProvider::new()
            .with_body(1, race_xml(("Older", "Selection")))
            .with_body(2, race_xml(("Newer", "Selection")));
        let (gate_one, gate_two) = (provider.gate(1), provider.gate(2));
        let mut board = board_with(provider, Arc::new(MemoryCache::new()));

        let first = board.select(Season::Year(2023), Round::Number(1));
        let second = board.select(Season::Year(2023), Round::Number(2));
        assert_eq!(board.selection(), Some((Season::Year(2023), Round::Number(2))));

        gate_two.notify_one();
        second.await.unwrap();
        let shown = board.state().results().unwrap().driver_keys().next().map(str::to_string);
        assert_eq!(shown.as_deref(), Some("Newer Selection"));

        // The stale response completes later and replaces the newer one
        gate_one.notify_one();
        first.await.unwrap();
        let shown = board.state().results().unwrap().driver_keys().next().map(str::to_string);
        assert_eq!(shown.as_deref(), Some("Older Selection"));
    }

    #[tokio::test]
    async fn sort_mode_survives_new_data() {
        let cached = result_set(&[
            ("Slow Starter", "1:22.000", "2"),
            ("Quick Finisher", "1:21.000", "1"),
        ]);
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let gate = provider.gate(1);
        let mut board = board_with(provider, Arc::new(MemoryCache::with_snapshot(cached)));

        let sorted = board.toggle_sort().unwrap();
        assert_eq!(sorted.driver_keys(), ["Quick Finisher", "Slow Starter"]);
        assert_eq!(sorted.fastest_lap_leader(), Some("Quick Finisher"));

        let handle = board.select(Season::Year(2023), Round::Number(1));
        gate.notify_one();
        handle.await.unwrap();
        assert_eq!(board.view().unwrap().mode(), SortMode::FastestLap);

        let normal = board.toggle_sort().unwrap();
        assert_eq!(normal.mode(), SortMode::Normal);
        assert_eq!(normal.driver_keys(), ["Max Verstappen", "Nico Hülkenberg"]);
    }

    #[tokio::test]
    async fn updates_stream_reports_state_changes() {
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let gate = provider.gate(1);
        let mut board = board_with(provider, Arc::new(MemoryCache::new()));
        let mut updates = Box::pin(board.updates());

        assert_eq!(updates.next().await, Some(BoardState::Idle));

        let handle = board.select(Season::Year(2023), Round::Number(1));
        gate.notify_one();
        handle.await.unwrap();

        let next = updates.next().await.unwrap();
        assert!(matches!(next, BoardState::Ready { origin: Origin::Feed, .. }));
    }

    #[tokio::test]
    async fn start_paints_cache_then_fetches() {
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let gate = provider.gate(1);
        let cache = Arc::new(MemoryCache::with_snapshot(result_set(&[("Old", "N/A", "N/A")])));

        let board = ResultsBoard::start(
            Arc::new(provider),
            cache,
            ResultsNormalizer::default(),
            Season::Year(2023),
            Round::Number(1),
        );
        let mut rx = board.subscribe();
        assert!(matches!(board.state(), BoardState::Ready { origin: Origin::Cache, .. }));

        gate.notify_one();
        rx.changed().await.unwrap();
        assert!(matches!(board.state(), BoardState::Ready { origin: Origin::Feed, .. }));
    }

    #[tokio::test]
    async fn races_come_from_the_provider() {
        let board = board_with(GatedProvider::new(), Arc::new(MemoryCache::new()));
        let races = board.races(Season::Year(2023)).await.unwrap();
        assert_eq!(races[0].race_name, "Bahrain Grand Prix");
    }

    #[tokio::test]
    async fn dropping_the_board_cancels_pending_fetches() {
        let provider = GatedProvider::new().with_body(1, race_xml(("Max", "Verstappen")));
        let cache = Arc::new(MemoryCache::new());
        let mut board = board_with(provider, Arc::clone(&cache));

        let handle = board.select(Season::Year(2023), Round::Number(1));
        drop(board);
        handle.await.unwrap();

        assert_eq!(cache.save_count(), 0);
    }
}
