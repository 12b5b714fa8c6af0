//! Live event controller: keeps the current / next event of a calendar
//! published, and wakes itself up exactly at the next event boundary.
//!
//! Every operation, including the wake-up callback, runs under a single
//! lock. A cycle reads the reference instant once, resolves and publishes
//! the (filtered) live state, then arms the wake-up from the (unfiltered)
//! calendar boundaries at that same instant.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;

use livecal_domain::config::LiveEventConfig;
use livecal_domain::error::{CommunicationError, ConfigurationError, LiveEventError};
use livecal_domain::status::{LiveStatus, StatusDetail};
use livecal_domain::time::Timestamp;

use crate::ports::{BridgeStatus, CalendarBridge, Clock, StatePublisher};
use crate::reference_clock::ReferenceClock;
use crate::rescheduler::{self, WakeupSlot, WakeupTask};
use crate::resolver;

/// Lifecycle phase of a [`LiveEventController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    /// The bridge is not online; nothing is resolved until it reports back.
    Waiting,
    Ready,
    /// The configuration is broken; every trigger reports the error again.
    Misconfigured,
    Disposed,
}

impl Phase {
    fn accepts_triggers(self) -> bool {
        matches!(self, Self::Waiting | Self::Ready | Self::Misconfigured)
    }
}

/// Drives one live event.
///
/// Cheap to clone; all clones share the same state and wake-up.
pub struct LiveEventController<B: CalendarBridge, P, K> {
    shared: Arc<Shared<B, P, K>>,
}

impl<B: CalendarBridge, P, K> Clone for LiveEventController<B, P, K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<B: CalendarBridge, P, K> {
    bridge: Option<B>,
    publisher: P,
    clock: ReferenceClock<K>,
    config: LiveEventConfig,
    inner: Mutex<Inner<B::Calendar>>,
}

struct Inner<C> {
    phase: Phase,
    status: LiveStatus,
    calendar: Option<Arc<C>>,
    wakeup: WakeupSlot,
}

impl<B, P, K> LiveEventController<B, P, K>
where
    B: CalendarBridge + 'static,
    P: StatePublisher + 'static,
    K: Clock + 'static,
{
    /// Create a controller. `bridge` is `None` when the live event is not
    /// attached to any calendar source, which [`initialize`](Self::initialize)
    /// reports as a configuration error.
    pub fn new(bridge: Option<B>, publisher: P, clock: K, config: LiveEventConfig) -> Self {
        let clock = ReferenceClock::new(clock, config.reference_offset());
        Self {
            shared: Arc::new(Shared {
                bridge,
                publisher,
                clock,
                config,
                inner: Mutex::new(Inner {
                    phase: Phase::Uninitialized,
                    status: LiveStatus::Unknown,
                    calendar: None,
                    wakeup: WakeupSlot::new(),
                }),
            }),
        }
    }

    /// Validate the configuration, fetch the calendar and run the first
    /// cycle.
    ///
    /// A bridge that is not online is not an error: the controller waits
    /// for [`bridge_status_changed`](Self::bridge_status_changed).
    ///
    /// # Errors
    ///
    /// - [`LiveEventError::Configuration`] for a missing bridge or a broken
    ///   text filter; no cycle runs
    /// - [`LiveEventError::Communication`] when the calendar is unavailable
    /// - [`LiveEventError::Disposed`] after [`dispose`](Self::dispose)
    pub async fn initialize(&self) -> Result<(), LiveEventError> {
        self.shared.initialize().await
    }

    /// Re-resolve and reschedule.
    ///
    /// Ignored before initialization and after disposal.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the cycle, after it was reported as a
    /// status change or logged.
    pub async fn refresh(&self) -> Result<(), LiveEventError> {
        let mut inner = self.shared.inner.lock().await;
        if !inner.phase.accepts_triggers() {
            tracing::debug!(phase = ?inner.phase, "ignoring refresh");
            return Ok(());
        }
        self.shared.run_cycle(&mut inner).await
    }

    /// The bridge has a new calendar: fetch it, then refresh.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh).
    pub async fn calendar_updated(&self) -> Result<(), LiveEventError> {
        let mut inner = self.shared.inner.lock().await;
        if !inner.phase.accepts_triggers() {
            tracing::debug!(phase = ?inner.phase, "ignoring calendar update");
            return Ok(());
        }
        inner.calendar = self
            .shared
            .bridge
            .as_ref()
            .and_then(CalendarBridge::runtime_calendar);
        self.shared.run_cycle(&mut inner).await
    }

    /// React to a connectivity change of the bridge.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh) when the bridge came online.
    pub async fn bridge_status_changed(&self, status: BridgeStatus) -> Result<(), LiveEventError> {
        let mut inner = self.shared.inner.lock().await;
        if !inner.phase.accepts_triggers() {
            tracing::debug!(phase = ?inner.phase, ?status, "ignoring bridge status change");
            return Ok(());
        }
        match status {
            BridgeStatus::Online => self.shared.run_cycle(&mut inner).await,
            BridgeStatus::Offline => {
                inner.wakeup.cancel();
                inner.phase = Phase::Waiting;
                self.shared
                    .set_status(&mut inner, LiveStatus::offline(StatusDetail::BridgeOffline))
                    .await;
                Ok(())
            }
            BridgeStatus::Unknown => {
                self.shared.set_status(&mut inner, LiveStatus::Unknown).await;
                Ok(())
            }
        }
    }

    /// Cancel the pending wake-up and release the calendar. No callback
    /// runs afterwards. Calling it again is a no-op.
    pub async fn dispose(&self) {
        let mut inner = self.shared.inner.lock().await;
        if inner.phase == Phase::Disposed {
            return;
        }
        inner.wakeup.cancel();
        inner.calendar = None;
        inner.phase = Phase::Disposed;
        tracing::debug!("live event disposed");
    }

    pub async fn phase(&self) -> Phase {
        self.shared.inner.lock().await.phase
    }

    pub async fn status(&self) -> LiveStatus {
        self.shared.inner.lock().await.status.clone()
    }

    /// Instant the armed wake-up targets, if any.
    pub async fn pending_wakeup(&self) -> Option<Timestamp> {
        self.shared.inner.lock().await.wakeup.target()
    }
}

impl<B, P, K> Shared<B, P, K>
where
    B: CalendarBridge + 'static,
    P: StatePublisher + 'static,
    K: Clock + 'static,
{
    async fn initialize(self: &Arc<Self>) -> Result<(), LiveEventError> {
        let mut inner = self.inner.lock().await;
        match inner.phase {
            Phase::Disposed => return Err(LiveEventError::Disposed),
            Phase::Uninitialized => {}
            phase => tracing::debug!(?phase, "live event initialized again"),
        }

        let Some(bridge) = &self.bridge else {
            return self
                .abort_cycle(
                    &mut inner,
                    Phase::Misconfigured,
                    ConfigurationError::MissingBridge.into(),
                )
                .await;
        };

        if self.config.has_dangling_filter_field() {
            tracing::warn!(
                field = ?self.config.text_event_field,
                "text event field is set without a value type"
            );
        }
        if let Err(err) = self.config.text_filter() {
            return self
                .abort_cycle(&mut inner, Phase::Misconfigured, err.into())
                .await;
        }

        if bridge.status() != BridgeStatus::Online {
            inner.wakeup.cancel();
            inner.phase = Phase::Waiting;
            self.set_status(&mut inner, LiveStatus::offline(StatusDetail::BridgeOffline))
                .await;
            return Ok(());
        }

        inner.phase = Phase::Ready;
        self.set_status(&mut inner, LiveStatus::Unknown).await;
        inner.calendar = bridge.runtime_calendar();
        self.run_cycle(&mut inner).await
    }

    /// One resolve + publish + reschedule cycle.
    async fn run_cycle(
        self: &Arc<Self>,
        inner: &mut Inner<B::Calendar>,
    ) -> Result<(), LiveEventError> {
        let Some(bridge) = &self.bridge else {
            return self
                .abort_cycle(
                    inner,
                    Phase::Misconfigured,
                    ConfigurationError::MissingBridge.into(),
                )
                .await;
        };
        if bridge.status() != BridgeStatus::Online {
            return self
                .abort_cycle(inner, Phase::Waiting, CommunicationError::BridgeOffline.into())
                .await;
        }

        let reference = self.clock.reference();

        let filter = match self.config.text_filter() {
            Ok(filter) => filter,
            Err(err) => {
                return self
                    .abort_cycle(inner, Phase::Misconfigured, err.into())
                    .await;
            }
        };
        inner.phase = Phase::Ready;

        if inner.calendar.is_none() {
            inner.calendar = bridge.runtime_calendar();
        }
        let calendar = inner.calendar.clone();

        let state = match resolver::resolve(calendar.as_deref(), reference, filter.as_ref()) {
            Ok(state) => state,
            Err(err) => return self.abort_cycle(inner, Phase::Ready, err.into()).await,
        };

        self.set_status(inner, LiveStatus::Online).await;
        tracing::debug!(
            %reference,
            current = state.current.as_ref().map(|event| event.title.as_str()),
            next = state.next.as_ref().map(|event| event.title.as_str()),
            "live state resolved"
        );
        let published = self.publisher.publish(state).await;
        if let Err(err) = &published {
            tracing::warn!(reason = %err.reason(), "failed to publish live state");
        }

        if let Err(err) = self.reschedule(inner, calendar.as_deref(), reference) {
            self.set_status(inner, LiveStatus::from(&err)).await;
            return Err(err);
        }
        published
    }

    /// Arm the wake-up for the next boundary after `reference`, or leave the
    /// controller idle when there is none.
    fn reschedule(
        self: &Arc<Self>,
        inner: &mut Inner<B::Calendar>,
        calendar: Option<&B::Calendar>,
        reference: Timestamp,
    ) -> Result<(), LiveEventError> {
        match rescheduler::next_wakeup(calendar, reference) {
            Ok(Some(target)) => {
                let shared = Arc::downgrade(self);
                inner.wakeup.arm(reference, target, move |generation| {
                    Self::wakeup_task(shared, generation)
                });
                Ok(())
            }
            Ok(None) => {
                inner.wakeup.cancel();
                tracing::debug!("no upcoming event boundary, waiting for a calendar update");
                Ok(())
            }
            Err(err) => {
                inner.wakeup.cancel();
                tracing::warn!(%err, "could not schedule the next state update");
                Err(err.into())
            }
        }
    }

    fn wakeup_task(shared: Weak<Self>, generation: u64) -> WakeupTask {
        Box::pin(async move {
            if let Some(shared) = shared.upgrade() {
                shared.on_wakeup(generation).await;
            }
        })
    }

    async fn on_wakeup(self: Arc<Self>, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.phase == Phase::Disposed {
            return;
        }
        if !inner.wakeup.claim(generation) {
            tracing::trace!(generation, "stale wake-up ignored");
            return;
        }

        tracing::debug!(generation, "wake-up fired");
        if let Err(err) = self.run_cycle(&mut inner).await {
            tracing::warn!(reason = %err.reason(), "scheduled state update failed");
        }
    }

    async fn abort_cycle(
        &self,
        inner: &mut Inner<B::Calendar>,
        phase: Phase,
        err: LiveEventError,
    ) -> Result<(), LiveEventError> {
        inner.wakeup.cancel();
        inner.phase = phase;
        self.set_status(inner, LiveStatus::from(&err)).await;
        tracing::debug!(?phase, reason = %err.reason(), "live event cycle aborted");
        Err(err)
    }

    async fn set_status(&self, inner: &mut Inner<B::Calendar>, status: LiveStatus) {
        if inner.status == status {
            return;
        }
        tracing::info!(%status, "live event status changed");
        inner.status = status.clone();
        if let Err(err) = self.publisher.update_status(status).await {
            tracing::warn!(reason = %err.reason(), "failed to report live event status");
        }
    }
}
