//! Stream lifecycle monitor.
//!
//! Polls a live input's lifecycle endpoint and turns the raw live/not-live
//! answers into debounced transitions:
//!
//! - one live poll is enough to report the stream as live;
//! - `disconnect_threshold` consecutive non-live polls are needed to report
//!   it offline;
//! - polling errors are reported once, and only after they have persisted
//!   for `error_threshold` without a successful poll in between.

use crate::config::MonitorConfig;
use crate::errors::ProxyError;
use crate::lifecycle_client::LifecycleClient;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Live,
    Offline,
}

/// A transition worth telling someone about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    WentLive,
    WentOffline,
    ErrorPersisted(ProxyError),
}

/// Callbacks fired on monitor transitions.
pub trait StreamEvents {
    fn on_live(&self);
    fn on_offline(&self);
    fn on_error(&self, error: &ProxyError);
}

/// Reports transitions through `tracing`.
pub struct LoggingEvents;

impl StreamEvents for LoggingEvents {
    fn on_live(&self) {
        tracing::info!("🔴 Stream went live");
    }

    fn on_offline(&self) {
        tracing::info!("⚫ Stream went offline");
    }

    fn on_error(&self, error: &ProxyError) {
        tracing::error!("❗ Stream lifecycle polling keeps failing: {}", error);
    }
}

/// Routes an event to the matching callback.
pub fn dispatch<E: StreamEvents>(event: &MonitorEvent, events: &E) {
    match event {
        MonitorEvent::WentLive => events.on_live(),
        MonitorEvent::WentOffline => events.on_offline(),
        MonitorEvent::ErrorPersisted(error) => events.on_error(error),
    }
}

pub struct StreamMonitor {
    disconnect_threshold: u32,
    error_threshold: Duration,
    current_state: Option<StreamState>,
    disconnect_count: u32,
    first_error_at: Option<Instant>,
    error_reported: bool,
}

impl StreamMonitor {
    pub fn new(disconnect_threshold: u32, error_threshold: Duration) -> Self {
        Self {
            disconnect_threshold,
            error_threshold,
            current_state: None,
            disconnect_count: 0,
            first_error_at: None,
            error_reported: false,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.disconnect_threshold,
            Duration::from_secs(config.error_threshold_secs),
        )
    }

    /// Last reported state, `None` until the first transition.
    pub fn current_state(&self) -> Option<StreamState> {
        self.current_state
    }

    pub fn disconnect_count(&self) -> u32 {
        self.disconnect_count
    }

    /// Folds one poll outcome into the monitor and returns the transition
    /// it caused, if any.
    pub fn record(
        &mut self,
        outcome: Result<bool, ProxyError>,
        now: Instant,
    ) -> Option<MonitorEvent> {
        match outcome {
            Ok(live) => {
                self.first_error_at = None;
                self.error_reported = false;
                if live {
                    self.record_live()
                } else {
                    self.record_not_live()
                }
            }
            Err(error) => self.record_error(error, now),
        }
    }

    fn record_live(&mut self) -> Option<MonitorEvent> {
        self.disconnect_count = 0;
        if self.current_state == Some(StreamState::Live) {
            return None;
        }
        tracing::info!("Stream is live");
        self.current_state = Some(StreamState::Live);
        Some(MonitorEvent::WentLive)
    }

    fn record_not_live(&mut self) -> Option<MonitorEvent> {
        self.disconnect_count = self.disconnect_count.saturating_add(1);
        tracing::info!(
            "Stream not live. Disconnect count: {}",
            self.disconnect_count
        );
        if self.disconnect_count < self.disconnect_threshold
            || self.current_state == Some(StreamState::Offline)
        {
            return None;
        }
        tracing::info!("Disconnect threshold reached");
        self.current_state = Some(StreamState::Offline);
        Some(MonitorEvent::WentOffline)
    }

    fn record_error(&mut self, error: ProxyError, now: Instant) -> Option<MonitorEvent> {
        tracing::error!("Error during polling: {}", error);
        // The first failure only starts the window
        let Some(first_error_at) = self.first_error_at else {
            self.first_error_at = Some(now);
            return None;
        };
        if self.error_reported || now.duration_since(first_error_at) < self.error_threshold {
            return None;
        }
        self.error_reported = true;
        Some(MonitorEvent::ErrorPersisted(error))
    }

    /// Polls once and fires the callback for any resulting transition.
    pub async fn poll_once<E: StreamEvents>(
        &mut self,
        client: &LifecycleClient,
        events: &E,
    ) -> Option<MonitorEvent> {
        let outcome = client.fetch_live().await;
        let event = self.record(outcome, Instant::now());
        if let Some(ref event) = event {
            dispatch(event, events);
        }
        event
    }

    /// Polls forever, one request per `poll_interval`.
    pub async fn run<E: StreamEvents>(
        mut self,
        client: &LifecycleClient,
        events: &E,
        poll_interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.poll_once(client, events).await;
        }
    }
}
