//! Live telemetry source.
//!
//! The network client itself is external: it owns the [`Sender`] half of a
//! channel and pushes one `f64` per update. The acquisition thread forwards
//! those samples into a bounded queue, evicting the oldest when the reader
//! falls behind.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};

use super::{Acquisition, SampleQueue, SampleSource};
use crate::config::SourceSettings;
use crate::error::Result;

/// Robot address when tethered over USB
pub const USB_ADDRESS: &str = "172.22.11.2";

/// Where the live client connects and which topic it follows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEndpoint {
    /// Topic the external client subscribes to
    #[serde(default)]
    pub topic: String,

    /// Connect over the USB tether
    #[serde(default = "default_use_usb")]
    pub use_usb: bool,

    /// FRC team number, used for the `10.TE.AM.2` address
    #[serde(default)]
    pub team_number: Option<u32>,

    /// Explicit address, overrides everything else
    #[serde(default)]
    pub address: Option<String>,
}

fn default_use_usb() -> bool {
    true
}

impl Default for LiveEndpoint {
    fn default() -> Self {
        Self {
            topic: String::new(),
            use_usb: default_use_usb(),
            team_number: None,
            address: None,
        }
    }
}

impl LiveEndpoint {
    /// Resolve the server address: explicit address, then USB, then team number.
    pub fn server_address(&self) -> Option<String> {
        if let Some(address) = &self.address {
            return Some(address.clone());
        }
        if self.use_usb {
            return Some(USB_ADDRESS.to_string());
        }
        self.team_number.map(team_address)
    }
}

/// `10.TE.AM.2` address for a team number.
pub fn team_address(team: u32) -> String {
    format!("10.{}.{}.2", team / 100, team % 100)
}

/// Source fed by an external producer over a crossbeam channel.
#[derive(Debug)]
pub struct LiveSource {
    receiver: Receiver<f64>,
    queue: Arc<SampleQueue>,
    settings: SourceSettings,
    endpoint: LiveEndpoint,
    acquisition: Acquisition,
}

impl LiveSource {
    pub fn new(receiver: Receiver<f64>, settings: &SourceSettings) -> Self {
        Self {
            receiver,
            queue: Arc::new(SampleQueue::new(settings.queue_capacity)),
            settings: settings.clone(),
            endpoint: LiveEndpoint::default(),
            acquisition: Acquisition::new(),
        }
    }

    /// Source plus the sender an external client pushes into.
    pub fn channel(settings: &SourceSettings) -> (Self, Sender<f64>) {
        let (tx, rx) = bounded(settings.queue_capacity.max(1));
        (Self::new(rx, settings), tx)
    }

    pub fn with_endpoint(mut self, endpoint: LiveEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> &LiveEndpoint {
        &self.endpoint
    }

    pub fn queue(&self) -> &SampleQueue {
        &self.queue
    }
}

impl SampleSource for LiveSource {
    fn describe(&self) -> String {
        match self.endpoint.server_address() {
            Some(address) if !self.endpoint.topic.is_empty() => {
                format!("live {} @ {}", self.endpoint.topic, address)
            }
            Some(address) => format!("live @ {}", address),
            None => "live".to_string(),
        }
    }

    fn is_connected(&self) -> bool {
        self.acquisition.is_running() || !self.queue.is_empty()
    }

    fn get_data(&self) -> Vec<f64> {
        self.queue.drain()
    }

    fn start(&self) -> Result<bool> {
        let receiver = self.receiver.clone();
        let queue = self.queue.clone();
        let timeout = self.settings.poll_interval();

        self.acquisition.start("live-source", move |running| {
            while running.load(Ordering::SeqCst) {
                match receiver.recv_timeout(timeout) {
                    Ok(value) => {
                        if queue.push(value) {
                            tracing::trace!("Live queue full, evicted oldest sample");
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        tracing::info!("Live producer disconnected");
                        running.store(false, Ordering::SeqCst);
                    }
                }
            }
        })
    }

    fn stop(&self) {
        self.acquisition.stop();
        let dropped = self.queue.dropped();
        if dropped > 0 {
            tracing::debug!(dropped, "Live source stopped with evicted samples");
        }
        self.queue.clear();
    }

    fn dropped_samples(&self) -> u64 {
        self.queue.dropped()
    }
}

impl Drop for LiveSource {
    fn drop(&mut self) {
        self.acquisition.stop();
    }
}
