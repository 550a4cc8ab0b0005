use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_core::{build_query, EnrichmentStatus, PushEvent, QueryParams, Record, SortRuleSet};
use catalog_engine::{
    CancellationToken, ChannelEventSink, ChannelPushTransport, EngineError, EngineEvent,
    EngineHandle, EngineSettings, FailureKind, FetchError, FetcherSettings, GameApi, PushTopic,
};
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(2);

struct CatalogApi {
    games: Vec<Record>,
    queries: Mutex<Vec<QueryParams>>,
}

impl CatalogApi {
    fn new(games: Vec<Record>) -> Self {
        Self {
            games,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl GameApi for CatalogApi {
    async fn fetch_list(
        &self,
        params: &QueryParams,
        _cancel: CancellationToken,
    ) -> Result<Vec<Record>, FetchError> {
        self.queries.lock().unwrap().push(params.clone());
        let needle = params.free_text.clone().unwrap_or_default().to_lowercase();
        Ok(self
            .games
            .iter()
            .filter(|game| game.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn fetch_filter_options(&self) -> Result<Vec<String>, FetchError> {
        Ok(vec!["Puzzle".to_string(), "Shooter".to_string()])
    }

    async fn fetch_record(&self, id: u64) -> Result<Record, FetchError> {
        self.games
            .iter()
            .find(|game| game.id == id)
            .cloned()
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "404 Not Found"))
    }
}

fn game(id: u64, name: &str, status: EnrichmentStatus) -> Record {
    Record {
        id,
        name: name.to_string(),
        steam_app_id: None,
        genre: None,
        enrichment_status: status,
        release_date: None,
        short_description: None,
    }
}

fn search(text: &str) -> QueryParams {
    build_query(text, "", "", &SortRuleSet::new())
}

fn start(
    api: Arc<CatalogApi>,
    transport: ChannelPushTransport,
) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let handle = EngineHandle::start(
        api,
        Arc::new(transport),
        EngineSettings {
            fetcher: FetcherSettings {
                quiet_period: Duration::from_millis(30),
            },
            topic: PushTopic::default(),
        },
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine starts");
    (handle, rx)
}

#[test]
fn rapid_schedules_resolve_only_the_latest() {
    let api = Arc::new(CatalogApi::new(vec![
        game(1, "Halo", EnrichmentStatus::Done),
        game(2, "Portal", EnrichmentStatus::Pending),
    ]));
    let (mut engine, events) = start(api.clone(), ChannelPushTransport::default());

    engine.schedule_fetch(1, search("h")).unwrap();
    engine.schedule_fetch(2, search("ha")).unwrap();
    engine.schedule_fetch(3, search("portal")).unwrap();

    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::FetchStarted { request_id: 3 }
    );
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::FetchResolved {
            request_id: 3,
            records: vec![game(2, "Portal", EnrichmentStatus::Pending)],
        }
    );
    assert_eq!(*api.queries.lock().unwrap(), vec![search("portal")]);

    engine.shutdown();
}

#[test]
fn filter_options_and_record_lookup_are_delivered() {
    let api = Arc::new(CatalogApi::new(vec![game(7, "Braid", EnrichmentStatus::Done)]));
    let (mut engine, events) = start(api, ChannelPushTransport::default());

    engine.load_filter_options().unwrap();
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::FilterOptions(Ok(vec!["Puzzle".to_string(), "Shooter".to_string()]))
    );

    engine.load_record(8).unwrap();
    match events.recv_timeout(WAIT).unwrap() {
        EngineEvent::RecordLoaded { id, result } => {
            assert_eq!(id, 8);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.shutdown();
}

#[test]
fn push_events_flow_until_shutdown() {
    let transport = ChannelPushTransport::default();
    let api = Arc::new(CatalogApi::new(Vec::new()));
    let (mut engine, events) = start(api, transport.clone());

    engine.subscribe_push().unwrap();
    // Subscribing twice keeps a single subscription.
    engine.subscribe_push().unwrap();

    let deadline = std::time::Instant::now() + WAIT;
    while transport.subscriber_count() == 0 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(transport.subscriber_count(), 1);

    let update = PushEvent {
        record: game(1, "Halo", EnrichmentStatus::Done),
        status: EnrichmentStatus::Done,
    };
    transport.publish(&PushTopic::default(), update.clone());
    assert_eq!(events.recv_timeout(WAIT).unwrap(), EngineEvent::Push(update));

    engine.shutdown();
    assert_eq!(transport.subscriber_count(), 0);
}

#[test]
fn commands_after_shutdown_are_rejected() {
    let api = Arc::new(CatalogApi::new(Vec::new()));
    let (mut engine, events) = start(api, ChannelPushTransport::default());

    engine.shutdown();
    engine.shutdown();

    assert!(matches!(
        engine.schedule_fetch(1, search("x")),
        Err(EngineError::Stopped)
    ));
    assert!(events.recv_timeout(Duration::from_millis(100)).is_err());
}
