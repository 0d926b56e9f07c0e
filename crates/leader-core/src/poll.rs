//! Poll-until-ready loops
//!
//! Two variants share one [`PollPolicy`]:
//!
//! - [`Poller::wait_until_available`] has no cap. It is used on first boot,
//!   where no recovery action exists; a server that never comes up keeps the
//!   bootstrap waiting until an operator steps in.
//! - [`Poller::wait_bounded`] gives up after `max_attempts` probes and is
//!   used after an explicit restart. [`Poller::settle`] adds the grace period
//!   the health endpoint needs before plugin registries and job queues are
//!   initialized.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::PollPolicy;
use crate::probe::AvailabilityProbe;
use crate::{Error, Result};

/// Blocking sleep, swappable in tests
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Drives an [`AvailabilityProbe`] according to a [`PollPolicy`]
pub struct Poller<'a> {
    probe: &'a dyn AvailabilityProbe,
    sleeper: &'a dyn Sleeper,
    policy: PollPolicy,
}

impl<'a> Poller<'a> {
    pub fn new(
        probe: &'a dyn AvailabilityProbe,
        sleeper: &'a dyn Sleeper,
        policy: &PollPolicy,
    ) -> Self {
        Self {
            probe,
            sleeper,
            policy: *policy,
        }
    }

    /// Probe until the server answers, sleeping `interval` between probes.
    ///
    /// Returns the number of probes issued. Never gives up.
    pub fn wait_until_available(&self) -> u64 {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            if self.probe.is_available() {
                info!(attempts, "Jenkins is available");
                return attempts;
            }
            debug!(
                attempts,
                interval_secs = self.policy.interval_secs,
                "Jenkins not available yet"
            );
            self.sleeper.sleep(self.policy.interval());
        }
    }

    /// Probe at most `max_attempts` times, sleeping `interval` between probes.
    ///
    /// Returns the attempt number that succeeded. After the last failed probe
    /// no further sleep is taken; the loop fails with
    /// [`Error::RestartTimedOut`].
    pub fn wait_bounded(&self) -> Result<u32> {
        let max_attempts = self.policy.max_attempts;
        for attempt in 1..=max_attempts {
            let available = self.probe.is_available();
            info!(attempt, max_attempts, available, "Availability check");
            if available {
                return Ok(attempt);
            }
            if attempt < max_attempts {
                info!(interval_secs = self.policy.interval_secs, "Sleeping before next check");
                self.sleeper.sleep(self.policy.interval());
            }
        }

        Err(Error::RestartTimedOut {
            attempts: max_attempts,
        })
    }

    /// Grace sleep after a successful bounded wait
    pub fn settle(&self) {
        debug!(settle_secs = self.policy.settle_secs, "Waiting for Jenkins to settle");
        self.sleeper.sleep(self.policy.settle());
    }
}
