//! Debounced, cancelable list fetching.
//!
//! [`DebouncedFetcher`] keeps a single slot holding the latest scheduled request
//! and its cancellation token. Scheduling replaces the slot atomically and cancels
//! the previous occupant, whether it is still waiting out the quiet period or
//! already on the wire. Delivery to the sink happens under the slot lock and only
//! while the request still owns the slot, so a superseded request can never emit
//! after its successor has been scheduled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use catalog_core::{QueryParams, RequestId};
use catalog_logging::{catalog_debug, catalog_trace, catalog_warn};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, GameApi};

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    /// Input must stay quiet this long before the request is sent.
    pub quiet_period: Duration,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherPhase {
    Idle,
    Scheduled(RequestId),
    InFlight(RequestId),
}

struct PendingFetch {
    request_id: RequestId,
    token: CancellationToken,
    in_flight: bool,
}

#[derive(Default)]
struct Slot {
    pending: Option<PendingFetch>,
}

impl Slot {
    fn owns(&self, request_id: RequestId, token: &CancellationToken) -> bool {
        !token.is_cancelled()
            && self
                .pending
                .as_ref()
                .is_some_and(|pending| pending.request_id == request_id)
    }
}

pub struct DebouncedFetcher {
    api: Arc<dyn GameApi>,
    sink: Arc<dyn EventSink>,
    settings: FetcherSettings,
    slot: Arc<Mutex<Slot>>,
}

impl DebouncedFetcher {
    pub fn new(
        api: Arc<dyn GameApi>,
        settings: FetcherSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            api,
            sink,
            settings,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Restarts the quiet period for `params`, discarding or cancelling whatever
    /// request was pending. Must be called from within a tokio runtime.
    pub fn schedule(&self, request_id: RequestId, params: QueryParams) {
        let token = CancellationToken::new();
        {
            let mut slot = lock(&self.slot);
            let previous = slot.pending.replace(PendingFetch {
                request_id,
                token: token.clone(),
                in_flight: false,
            });
            if let Some(previous) = previous {
                previous.token.cancel();
                catalog_debug!(
                    "fetch request_id={} superseded by request_id={} (in_flight={})",
                    previous.request_id,
                    request_id,
                    previous.in_flight
                );
            }
        }

        tokio::spawn(run_fetch(
            self.api.clone(),
            self.sink.clone(),
            self.slot.clone(),
            self.settings.quiet_period,
            request_id,
            params,
            token,
        ));
    }

    /// Cancels the pending request, if any. Nothing is emitted for it afterwards.
    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.slot).pending.take() {
            pending.token.cancel();
            catalog_debug!("fetch request_id={} cancelled", pending.request_id);
        }
    }

    pub fn phase(&self) -> FetcherPhase {
        match &lock(&self.slot).pending {
            None => FetcherPhase::Idle,
            Some(pending) if pending.in_flight => FetcherPhase::InFlight(pending.request_id),
            Some(pending) => FetcherPhase::Scheduled(pending.request_id),
        }
    }
}

impl Drop for DebouncedFetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_fetch(
    api: Arc<dyn GameApi>,
    sink: Arc<dyn EventSink>,
    slot: Arc<Mutex<Slot>>,
    quiet_period: Duration,
    request_id: RequestId,
    params: QueryParams,
    token: CancellationToken,
) {
    tokio::select! {
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(quiet_period) => {}
    }

    {
        let mut guard = lock(&slot);
        if !guard.owns(request_id, &token) {
            return;
        }
        if let Some(pending) = guard.pending.as_mut() {
            pending.in_flight = true;
        }
        sink.emit(EngineEvent::FetchStarted { request_id });
    }
    catalog_debug!("fetch request_id={} sent: {:?}", request_id, params);

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        result = api.fetch_list(&params, token.clone()) => result,
    };

    let mut guard = lock(&slot);
    if !guard.owns(request_id, &token) {
        catalog_trace!("dropping stale result for request_id={}", request_id);
        return;
    }
    guard.pending = None;
    match result {
        Ok(records) => sink.emit(EngineEvent::FetchResolved {
            request_id,
            records,
        }),
        Err(err) if err.is_cancelled() => {
            catalog_debug!("fetch request_id={} cancelled by transport", request_id);
        }
        Err(error) => {
            catalog_warn!("fetch request_id={} failed: {}", request_id, error);
            sink.emit(EngineEvent::FetchFailed { request_id, error });
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
