use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::clock::Clock;
use crate::config::BotSettings;
use crate::reddit::Gateway;
use crate::responder::{Handled, Responder};

/// Per-cycle tallies, logged after every cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub replied: usize,
    pub acknowledged: usize,
    pub rejected: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl CycleReport {
    fn record(&mut self, handled: &Handled) {
        match handled {
            Handled::Replied(outcome) if outcome.delivered() => self.replied += 1,
            Handled::Replied(_) => self.failed += 1,
            Handled::Acknowledged => self.acknowledged += 1,
            Handled::TooYoung => self.rejected += 1,
            Handled::Ignored => self.ignored += 1,
        }
    }
}

pub struct PollLoop<'a, G: Gateway, C: Clock> {
    gateway: &'a G,
    clock: &'a C,
    settings: &'a BotSettings,
    responder: Responder<'a, G, C>,
}

impl<'a, G: Gateway, C: Clock> PollLoop<'a, G, C> {
    pub fn new(gateway: &'a G, clock: &'a C, settings: &'a BotSettings) -> Self {
        Self::with_responder(gateway, clock, settings, Responder::new(gateway, clock, settings))
    }

    pub fn with_responder(
        gateway: &'a G,
        clock: &'a C,
        settings: &'a BotSettings,
        responder: Responder<'a, G, C>,
    ) -> Self {
        Self {
            gateway,
            clock,
            settings,
            responder,
        }
    }

    /// Polls until `max_cycles` cycles have run, or forever when `None`.
    /// A failed cycle is logged and followed by the same sleep as a good one.
    pub fn run(&self, max_cycles: Option<u64>) {
        info!("Starting...");
        let mut cycles = 0u64;

        while max_cycles.is_none_or(|max| cycles < max) {
            cycles += 1;
            info!("Checking inbox...");

            match self.run_cycle() {
                Ok(report) => info!(
                    "cycle {cycles}: fetched {} replied {} acknowledged {} rejected {} ignored {} failed {}",
                    report.fetched,
                    report.replied,
                    report.acknowledged,
                    report.rejected,
                    report.ignored,
                    report.failed
                ),
                Err(e) => error!(
                    "Error occurred in cycle {cycles}, sleeping {}s then continuing on: {e:?}",
                    self.settings.poll_interval.as_secs()
                ),
            }

            info!("Sleeping...");
            self.clock.sleep(self.settings.poll_interval);
        }
    }

    /// One drain of the unread inbox. Item failures are logged and the item is
    /// still consumed; fetch or mark-read failures abort the cycle.
    pub fn run_cycle(&self) -> Result<CycleReport> {
        let items = self
            .gateway
            .fetch_unread(self.settings.batch_size)
            .context("fetching unread inbox")?;

        let mut report = CycleReport {
            fetched: items.len(),
            ..CycleReport::default()
        };

        for item in &items {
            match self.responder.respond(item) {
                Ok(handled) => report.record(&handled),
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        "failed to handle {} from u/{}: {e}",
                        item.id,
                        item.author.as_deref().unwrap_or("[deleted]")
                    );
                }
            }

            self.gateway
                .mark_read(item)
                .with_context(|| format!("marking {} read", item.id))?;
        }

        Ok(report)
    }
}
