use std::sync::Arc;

use catalog_core::PushEvent;
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, PushError};

pub type PushStream = BoxStream<'static, Result<PushEvent, PushError>>;

/// Channel plus event name a subscription listens to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushTopic {
    pub channel: String,
    pub event: String,
}

impl Default for PushTopic {
    fn default() -> Self {
        Self {
            channel: "game.enriched".to_string(),
            event: "game.enrichment_status".to_string(),
        }
    }
}

/// Source of out-of-band record updates.
///
/// Implementations yield `Err` for payloads they could not decode and keep going;
/// the stream ends when the underlying connection does.
#[async_trait::async_trait]
pub trait PushTransport: Send + Sync {
    async fn subscribe(&self, topic: &PushTopic) -> Result<PushStream, PushError>;
}

/// In-process transport. Everything published on a topic reaches every live
/// subscriber of that topic.
#[derive(Debug, Clone)]
pub struct ChannelPushTransport {
    tx: broadcast::Sender<(PushTopic, PushEvent)>,
}

impl ChannelPushTransport {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns the number of subscribers the event was handed to.
    pub fn publish(&self, topic: &PushTopic, event: PushEvent) -> usize {
        self.tx.send((topic.clone(), event)).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelPushTransport {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait::async_trait]
impl PushTransport for ChannelPushTransport {
    async fn subscribe(&self, topic: &PushTopic) -> Result<PushStream, PushError> {
        let rx = self.tx.subscribe();
        let events = stream::unfold((rx, topic.clone()), |(mut rx, topic)| async move {
            loop {
                match rx.recv().await {
                    Ok((published_on, event)) if published_on == topic => {
                        return Some((Ok::<_, PushError>(event), (rx, topic)));
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        catalog_warn!("push subscriber lagged, {} events skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(events.boxed())
    }
}

/// A live subscription forwarding push events to a sink.
///
/// Dropping the handle unsubscribes, so no event reaches the sink once the owning
/// view is gone.
pub struct PushSubscription {
    topic: PushTopic,
    token: CancellationToken,
}

impl PushSubscription {
    /// Spawns the forwarding task. Must be called from within a tokio runtime.
    pub fn start(
        transport: Arc<dyn PushTransport>,
        topic: PushTopic,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let token = CancellationToken::new();
        tokio::spawn(forward_events(
            transport,
            topic.clone(),
            sink,
            token.clone(),
        ));
        Self { topic, token }
    }

    pub fn topic(&self) -> &PushTopic {
        &self.topic
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unsubscribe(&self) {
        if !self.token.is_cancelled() {
            self.token.cancel();
            catalog_info!("unsubscribed from {}", self.topic.channel);
        }
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn forward_events(
    transport: Arc<dyn PushTransport>,
    topic: PushTopic,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) {
    let subscribed = tokio::select! {
        _ = token.cancelled() => return,
        subscribed = transport.subscribe(&topic) => subscribed,
    };
    let mut events = match subscribed {
        Ok(events) => events,
        Err(err) => {
            catalog_warn!("push subscription to {} failed: {}", topic.channel, err);
            sink.emit(EngineEvent::PushUnavailable(err.to_string()));
            return;
        }
    };
    catalog_info!("subscribed to {} ({})", topic.channel, topic.event);

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            next = events.next() => next,
        };
        match next {
            Some(Ok(event)) => {
                catalog_debug!(
                    "push for record id={} status={}",
                    event.record.id,
                    event.status
                );
                sink.emit(EngineEvent::Push(event));
            }
            Some(Err(err)) => catalog_warn!("skipping push frame: {}", err),
            None => break,
        }
    }

    if !token.is_cancelled() {
        catalog_warn!("push stream for {} ended", topic.channel);
        sink.emit(EngineEvent::PushUnavailable(PushError::Closed.to_string()));
    }
}
