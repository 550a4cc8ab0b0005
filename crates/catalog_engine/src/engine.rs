use std::sync::Arc;
use std::thread;

use catalog_core::{QueryParams, RecordId, RequestId};
use catalog_logging::{catalog_info, catalog_warn};
use tokio::sync::mpsc;

use crate::{
    DebouncedFetcher, EngineError, EngineEvent, EventSink, FetcherSettings, GameApi,
    PushSubscription, PushTopic, PushTransport,
};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub fetcher: FetcherSettings,
    pub topic: PushTopic,
}

enum EngineCommand {
    ScheduleFetch {
        request_id: RequestId,
        params: QueryParams,
    },
    LoadFilterOptions,
    LoadRecord(RecordId),
    SubscribePush,
    Shutdown,
}

/// Runs the fetcher and the push subscription on a dedicated single-threaded
/// runtime. All results reach the caller through the sink.
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn start(
        api: Arc<dyn GameApi>,
        transport: Arc<dyn PushTransport>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let thread = thread::Builder::new()
            .name("catalog-engine".to_string())
            .spawn(move || {
                runtime.block_on(command_loop(cmd_rx, api, transport, settings, sink));
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    pub fn schedule_fetch(
        &self,
        request_id: RequestId,
        params: QueryParams,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::ScheduleFetch { request_id, params })
    }

    pub fn load_filter_options(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::LoadFilterOptions)
    }

    pub fn load_record(&self, id: RecordId) -> Result<(), EngineError> {
        self.send(EngineCommand::LoadRecord(id))
    }

    pub fn subscribe_push(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::SubscribePush)
    }

    /// Cancels the pending fetch, drops the push subscription and waits for the
    /// runtime thread to exit. Idempotent.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                catalog_warn!("engine thread panicked during shutdown");
            }
        }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| EngineError::Stopped)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn command_loop(
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
    api: Arc<dyn GameApi>,
    transport: Arc<dyn PushTransport>,
    settings: EngineSettings,
    sink: Arc<dyn EventSink>,
) {
    let fetcher = DebouncedFetcher::new(api.clone(), settings.fetcher.clone(), sink.clone());
    let mut subscription: Option<PushSubscription> = None;

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::ScheduleFetch { request_id, params } => {
                fetcher.schedule(request_id, params);
            }
            EngineCommand::LoadFilterOptions => {
                let api = api.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result = api.fetch_filter_options().await;
                    if let Err(err) = &result {
                        catalog_warn!("loading filter options failed: {}", err);
                    }
                    sink.emit(EngineEvent::FilterOptions(result));
                });
            }
            EngineCommand::LoadRecord(id) => {
                let api = api.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result = api.fetch_record(id).await;
                    sink.emit(EngineEvent::RecordLoaded { id, result });
                });
            }
            EngineCommand::SubscribePush => {
                if subscription.is_none() {
                    subscription = Some(PushSubscription::start(
                        transport.clone(),
                        settings.topic.clone(),
                        sink.clone(),
                    ));
                }
            }
            EngineCommand::Shutdown => break,
        }
    }

    fetcher.cancel();
    if let Some(subscription) = subscription.take() {
        subscription.unsubscribe();
    }
    catalog_info!("engine stopped");
}
