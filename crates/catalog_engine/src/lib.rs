//! Catalog engine: games API client, debounced fetching and push subscriptions.
mod api;
mod debounce;
mod engine;
mod push;
mod reverb;
mod types;

pub use api::{ApiSettings, GameApi, ReqwestGameApi};
pub use debounce::{DebouncedFetcher, FetcherPhase, FetcherSettings};
pub use engine::{EngineHandle, EngineSettings};
pub use push::{ChannelPushTransport, PushStream, PushSubscription, PushTopic, PushTransport};
pub use reverb::{decode_frame, subscribe_frame, Frame, PushSettings, ReverbTransport};
pub use types::{ChannelEventSink, EngineError, EngineEvent, EventSink, FailureKind, FetchError, PushError};

pub use tokio_util::sync::CancellationToken;
