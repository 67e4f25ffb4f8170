use log::{error, info, warn};
use std::time::Duration;

use crate::clock::Clock;
use crate::domain::inbox::{ReplyDraft, ReplyOutcome};
use crate::reddit::Gateway;

/// Sends replies with at most one retry, and only for recoverable failures.
pub struct Dispatcher<'a, G: Gateway, C: Clock> {
    gateway: &'a G,
    clock: &'a C,
    backoff: Duration,
}

impl<'a, G: Gateway, C: Clock> Dispatcher<'a, G, C> {
    pub fn new(gateway: &'a G, clock: &'a C, backoff: Duration) -> Self {
        Self {
            gateway,
            clock,
            backoff,
        }
    }

    pub fn dispatch(&self, draft: ReplyDraft) -> ReplyOutcome {
        let first = match self.gateway.send_reply(&draft) {
            Ok(()) => {
                info!("Message send successful to u/{}", draft.recipient);
                return ReplyOutcome::Sent;
            }
            Err(e) => e,
        };

        if !first.is_recoverable() {
            error!("Didn't send message to u/{}: {first}", draft.recipient);
            return ReplyOutcome::Dropped(first.to_string());
        }

        warn!(
            "Send to u/{} failed ({first}); retrying in {}s",
            draft.recipient,
            self.backoff.as_secs()
        );
        self.clock.sleep(self.backoff);

        match self.gateway.send_reply(&draft) {
            Ok(()) => {
                info!("Message send successful to u/{} after retry", draft.recipient);
                ReplyOutcome::SentAfterRetry
            }
            Err(second) => {
                error!(
                    "Didn't send message to u/{} after retry: {second}",
                    draft.recipient
                );
                ReplyOutcome::Dropped(format!("{first}; retry: {second}"))
            }
        }
    }
}
