//! Laravel Reverb push transport (Pusher protocol 7 over a websocket).

use catalog_core::PushEvent;
use futures_util::stream::{self, StreamExt};
use futures_util::SinkExt;
use serde::Deserialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::{PushError, PushStream, PushTopic, PushTransport};

const PROTOCOL_VERSION: &str = "7";
const PONG_FRAME: &str = r#"{"event":"pusher:pong","data":{}}"#;

#[derive(Debug, Clone)]
pub struct PushSettings {
    pub host: String,
    pub port: u16,
    pub app_key: String,
    pub topic: PushTopic,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            app_key: String::new(),
            topic: PushTopic::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Ping,
    Event(PushEvent),
    /// Connection bookkeeping or an event for another topic.
    Other,
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Decodes one text frame as seen by a subscriber of `topic`.
pub fn decode_frame(text: &str, topic: &PushTopic) -> Result<Frame, PushError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|err| PushError::Decode(err.to_string()))?;

    match envelope.event.as_str() {
        "pusher:ping" => Ok(Frame::Ping),
        "pusher:error" => Err(PushError::Protocol(
            envelope.data.map(|data| data.to_string()).unwrap_or_default(),
        )),
        event
            if event == topic.event
                && envelope.channel.as_deref() == Some(topic.channel.as_str()) =>
        {
            // App events carry their payload as a JSON-encoded string.
            let payload = match envelope.data {
                Some(Value::String(encoded)) => serde_json::from_str(&encoded),
                Some(object) => serde_json::from_value(object),
                None => return Err(PushError::Decode("event without data".to_string())),
            };
            payload
                .map(Frame::Event)
                .map_err(|err| PushError::Decode(err.to_string()))
        }
        _ => Ok(Frame::Other),
    }
}

pub fn subscribe_frame(channel: &str) -> String {
    serde_json::json!({
        "event": "pusher:subscribe",
        "data": { "channel": channel },
    })
    .to_string()
}

#[derive(Debug, Clone)]
pub struct ReverbTransport {
    settings: PushSettings,
}

impl ReverbTransport {
    pub fn new(settings: PushSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PushSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> Result<Url, PushError> {
        let mut url = Url::parse(&format!(
            "ws://{}:{}/app/{}",
            self.settings.host, self.settings.port, self.settings.app_key
        ))
        .map_err(|err| PushError::Connect(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("protocol", PROTOCOL_VERSION)
            .append_pair("client", "rust")
            .append_pair("version", env!("CARGO_PKG_VERSION"))
            .append_pair("flash", "false");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl PushTransport for ReverbTransport {
    async fn subscribe(&self, topic: &PushTopic) -> Result<PushStream, PushError> {
        let url = self.endpoint()?;
        let (mut socket, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|err| PushError::Connect(err.to_string()))?;
        socket
            .send(Message::text(subscribe_frame(&topic.channel)))
            .await
            .map_err(|err| PushError::Protocol(err.to_string()))?;

        let events = stream::unfold(Some((socket, topic.clone())), |state| async move {
            let Some((mut socket, topic)) = state else {
                return None;
            };
            loop {
                let message = match socket.next().await {
                    None => return None,
                    Some(Err(err)) => {
                        return Some((Err(PushError::Protocol(err.to_string())), None));
                    }
                    Some(Ok(message)) => message,
                };
                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(_) => return None,
                    _ => continue,
                };
                match decode_frame(text.as_str(), &topic) {
                    Ok(Frame::Ping) => {
                        if let Err(err) = socket.send(Message::text(PONG_FRAME)).await {
                            return Some((Err(PushError::Protocol(err.to_string())), None));
                        }
                    }
                    Ok(Frame::Other) => {}
                    Ok(Frame::Event(event)) => return Some((Ok(event), Some((socket, topic)))),
                    Err(err) => return Some((Err(err), Some((socket, topic)))),
                }
            }
        });
        Ok(events.boxed())
    }
}
