use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_core::{EnrichmentStatus, PushEvent, Record};
use catalog_engine::{
    decode_frame, ChannelPushTransport, EngineEvent, EventSink, Frame, PushError,
    PushSubscription, PushTopic, PushTransport,
};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn enriched(id: u64, status: EnrichmentStatus) -> PushEvent {
    PushEvent {
        record: Record {
            id,
            name: format!("Game {id}"),
            steam_app_id: Some(id * 10),
            genre: Some("Puzzle".to_string()),
            enrichment_status: status,
            release_date: Some("2007-10-10".to_string()),
            short_description: None,
        },
        status,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn subscription_forwards_events_in_arrival_order() {
    let transport = ChannelPushTransport::default();
    let sink = Arc::new(RecordingSink::default());
    let topic = PushTopic::default();

    let subscription =
        PushSubscription::start(Arc::new(transport.clone()), topic.clone(), sink.clone());
    settle().await;
    assert_eq!(transport.subscriber_count(), 1);

    transport.publish(&topic, enriched(1, EnrichmentStatus::InProgress));
    transport.publish(&topic, enriched(1, EnrichmentStatus::Done));
    settle().await;

    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::Push(enriched(1, EnrichmentStatus::InProgress)),
            EngineEvent::Push(enriched(1, EnrichmentStatus::Done)),
        ]
    );
    assert!(subscription.is_active());
}

#[tokio::test]
async fn other_topics_are_ignored() {
    let transport = ChannelPushTransport::default();
    let sink = Arc::new(RecordingSink::default());
    let _subscription = PushSubscription::start(
        Arc::new(transport.clone()),
        PushTopic::default(),
        sink.clone(),
    );
    settle().await;

    let elsewhere = PushTopic {
        channel: "game.deleted".to_string(),
        event: "game.enrichment_status".to_string(),
    };
    transport.publish(&elsewhere, enriched(3, EnrichmentStatus::Done));
    settle().await;

    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn dropping_the_subscription_stops_delivery() {
    let transport = ChannelPushTransport::default();
    let sink = Arc::new(RecordingSink::default());
    let topic = PushTopic::default();

    let subscription =
        PushSubscription::start(Arc::new(transport.clone()), topic.clone(), sink.clone());
    settle().await;
    drop(subscription);
    settle().await;

    assert_eq!(transport.publish(&topic, enriched(2, EnrichmentStatus::Done)), 0);
    settle().await;
    assert!(sink.take().is_empty());
}

struct UnreachableTransport;

#[async_trait::async_trait]
impl PushTransport for UnreachableTransport {
    async fn subscribe(
        &self,
        _topic: &PushTopic,
    ) -> Result<catalog_engine::PushStream, PushError> {
        Err(PushError::Connect("connection refused".to_string()))
    }
}

#[tokio::test]
async fn failed_subscription_is_reported() {
    let sink = Arc::new(RecordingSink::default());
    let _subscription = PushSubscription::start(
        Arc::new(UnreachableTransport),
        PushTopic::default(),
        sink.clone(),
    );
    settle().await;

    assert_eq!(
        sink.take(),
        vec![EngineEvent::PushUnavailable(
            "could not connect to push server: connection refused".to_string()
        )]
    );
}

#[tokio::test]
async fn channel_transport_stream_yields_published_events() {
    let transport = ChannelPushTransport::new(4);
    let topic = PushTopic::default();
    let mut stream = transport.subscribe(&topic).await.expect("subscribe");

    transport.publish(&topic, enriched(5, EnrichmentStatus::Failed));
    let event = stream.next().await.expect("event").expect("decoded");
    assert_eq!(event.status, EnrichmentStatus::Failed);
}

#[test]
fn reverb_event_frame_decodes_embedded_payload() {
    let topic = PushTopic::default();
    let payload = serde_json::json!({
        "game": {
            "id": 1,
            "name": "Halo",
            "steam_app_id": 976730,
            "genre": "Shooter",
            "enrichment_status": "done",
            "release_date": "2001-11-15",
            "short_description": "Master Chief returns."
        },
        "status": "done"
    });
    let frame = serde_json::json!({
        "event": "game.enrichment_status",
        "channel": "game.enriched",
        "data": payload.to_string(),
    })
    .to_string();

    match decode_frame(&frame, &topic).expect("decoded") {
        Frame::Event(event) => {
            assert_eq!(event.record.id, 1);
            assert_eq!(event.status, EnrichmentStatus::Done);
        }
        other => panic!("unexpected frame {other:?}"),
    }
}

#[test]
fn reverb_bookkeeping_frames() {
    let topic = PushTopic::default();

    assert_eq!(
        decode_frame(r#"{"event":"pusher:ping","data":{}}"#, &topic),
        Ok(Frame::Ping)
    );
    assert_eq!(
        decode_frame(
            r#"{"event":"pusher:connection_established","data":"{\"socket_id\":\"1.2\"}"}"#,
            &topic
        ),
        Ok(Frame::Other)
    );
    assert_eq!(
        decode_frame(
            r#"{"event":"pusher_internal:subscription_succeeded","channel":"game.enriched"}"#,
            &topic
        ),
        Ok(Frame::Other)
    );
    assert_eq!(
        decode_frame(
            r#"{"event":"game.enrichment_status","channel":"other","data":"{}"}"#,
            &topic
        ),
        Ok(Frame::Other)
    );
}

#[test]
fn reverb_bad_payload_is_a_decode_error() {
    let topic = PushTopic::default();
    let frame = r#"{"event":"game.enrichment_status","channel":"game.enriched","data":"{\"status\":\"done\"}"}"#;

    assert!(matches!(
        decode_frame(frame, &topic),
        Err(PushError::Decode(_))
    ));
    assert!(matches!(
        decode_frame("not json", &topic),
        Err(PushError::Decode(_))
    ));
}
