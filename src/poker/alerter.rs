//! Blind alerts
//!
//! Fire-and-forget notices that the blind has gone up.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

/// Schedules a blind-level notice at some offset from now
pub trait BlindAlerter: Send + Sync {
    fn schedule_alert_at(&self, delay: Duration, amount: u32);
}

/// Writes `Blind is now {amount}` to a shared writer once each delay elapses
///
/// Every alert gets its own timer thread; nothing is cancelled on drop.
pub struct ScheduledAlerter<W> {
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send + 'static> ScheduledAlerter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Shared handle to the underlying writer
    pub fn writer(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }
}

impl<W: Write + Send + 'static> BlindAlerter for ScheduledAlerter<W> {
    fn schedule_alert_at(&self, delay: Duration, amount: u32) {
        let out = Arc::clone(&self.out);

        let spawned = thread::Builder::new()
            .name(format!("blind-alert-{}", amount))
            .spawn(move || {
                thread::sleep(delay);
                let mut out = out.lock();
                let written = writeln!(out, "Blind is now {}", amount).and_then(|_| out.flush());
                if let Err(e) = written {
                    tracing::warn!("Failed to write blind alert {}: {}", amount, e);
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to schedule blind alert {}: {}", amount, e);
        }
    }
}
