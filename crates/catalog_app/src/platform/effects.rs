use std::sync::mpsc;

use catalog_core::{Effect, Msg, Notification, Record, RecordId};
use catalog_engine::{EngineError, EngineEvent, EngineHandle, EventSink};
use catalog_logging::{catalog_error, catalog_info, catalog_warn};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppMsg {
    Core(Msg),
    RecordLoaded {
        id: RecordId,
        result: Result<Record, String>,
    },
    Input(String),
    InputClosed,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands IO effects to the engine. Notifications are returned for the caller
    /// to present.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            let sent = match effect {
                Effect::ScheduleFetch { request_id, params } => {
                    self.engine.schedule_fetch(request_id, params)
                }
                Effect::LoadFilterOptions => self.engine.load_filter_options(),
                Effect::SubscribePush => self.engine.subscribe_push(),
                Effect::Shutdown => {
                    self.engine.shutdown();
                    Ok(())
                }
                Effect::Notify(notification) => {
                    catalog_info!("notify {:?}: {}", notification.level, notification.message);
                    notifications.push(notification);
                    Ok(())
                }
            };
            if let Err(err) = sent {
                catalog_error!("engine rejected effect: {}", err);
            }
        }
        notifications
    }

    pub fn load_record(&self, id: RecordId) -> Result<(), EngineError> {
        self.engine.load_record(id)
    }
}

/// Forwards engine events into the main loop as messages.
pub struct AppEventSink {
    msg_tx: mpsc::Sender<AppMsg>,
}

impl AppEventSink {
    pub fn new(msg_tx: mpsc::Sender<AppMsg>) -> Self {
        Self { msg_tx }
    }
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::FetchStarted { request_id } => AppMsg::Core(Msg::FetchStarted { request_id }),
            EngineEvent::FetchResolved {
                request_id,
                records,
            } => AppMsg::Core(Msg::FetchResolved {
                request_id,
                records,
            }),
            EngineEvent::FetchFailed { request_id, error } => AppMsg::Core(Msg::FetchFailed {
                request_id,
                error: error.to_string(),
            }),
            EngineEvent::FilterOptions(Ok(genres)) => AppMsg::Core(Msg::FilterOptionsLoaded(genres)),
            EngineEvent::FilterOptions(Err(err)) => {
                AppMsg::Core(Msg::FilterOptionsFailed(err.to_string()))
            }
            EngineEvent::RecordLoaded { id, result } => AppMsg::RecordLoaded {
                id,
                result: result.map_err(|err| err.to_string()),
            },
            EngineEvent::Push(event) => AppMsg::Core(Msg::PushReceived(event)),
            EngineEvent::PushUnavailable(reason) => {
                catalog_warn!("live updates unavailable: {}", reason);
                return;
            }
        };
        let _ = self.msg_tx.send(msg);
    }
}
