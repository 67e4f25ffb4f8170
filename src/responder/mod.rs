//! Per-item handling: route, gate, compose, dispatch.

pub mod age_gate;
pub mod classify;
pub mod compose;
pub mod dispatch;
pub mod referral;

use log::{debug, info};

use crate::clock::Clock;
use crate::config::BotSettings;
use crate::domain::inbox::{InboxItem, ItemKind, ReplyDraft, ReplyOutcome};
use crate::error::ResponderError;
use crate::reddit::Gateway;

use age_gate::account_old_enough;
use classify::{Route, route_for};
use compose::compose;
use dispatch::Dispatcher;
use referral::CandidateSelector;

/// Terminal state of one inbox item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Replied(ReplyOutcome),
    Acknowledged,
    /// Author's account is too new to be answered.
    TooYoung,
    Ignored,
}

pub struct Responder<'a, G: Gateway, C: Clock> {
    gateway: &'a G,
    clock: &'a C,
    settings: &'a BotSettings,
    selector: CandidateSelector,
    dispatcher: Dispatcher<'a, G, C>,
}

impl<'a, G: Gateway, C: Clock> Responder<'a, G, C> {
    pub fn new(gateway: &'a G, clock: &'a C, settings: &'a BotSettings) -> Self {
        let selector =
            CandidateSelector::new(&settings.referral_subreddit, &settings.referral_page);
        Self::with_selector(gateway, clock, settings, selector)
    }

    pub fn with_selector(
        gateway: &'a G,
        clock: &'a C,
        settings: &'a BotSettings,
        selector: CandidateSelector,
    ) -> Self {
        Self {
            gateway,
            clock,
            settings,
            selector,
            dispatcher: Dispatcher::new(gateway, clock, settings.retry_backoff),
        }
    }

    /// Direct messages, plus mentions from allow-listed authors.
    pub fn wants(&self, item: &InboxItem) -> bool {
        match item.kind {
            ItemKind::DirectMessage => true,
            ItemKind::CommentMention => item.author.as_deref().is_some_and(|author| {
                self.settings
                    .mention_allowlist
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(author))
            }),
            ItemKind::Other => false,
        }
    }

    pub fn respond(&self, item: &InboxItem) -> Result<Handled, ResponderError> {
        if !self.wants(item) {
            debug!("ignoring {} ({:?})", item.id, item.kind);
            return Ok(Handled::Ignored);
        }
        let Some(author) = item.author.as_deref() else {
            debug!("ignoring {}: no author", item.id);
            return Ok(Handled::Ignored);
        };

        info!("Responding to u/{author}");
        let route = route_for(item, self.settings);
        if route == Route::Acknowledge {
            info!(
                "u/{author} replied to our message. Subject: {} | Body: {}",
                item.subject, item.body
            );
            return Ok(Handled::Acknowledged);
        }

        let created = self.gateway.fetch_account_created(author)?;
        if !account_old_enough(created, self.clock.now(), self.settings.min_account_age) {
            info!("u/{author} account created {created} is too new; not replying");
            return Ok(Handled::TooYoung);
        }
        debug!("u/{author} age verified");

        let candidate = match route {
            Route::Referral => Some(self.selector.select(self.gateway)?),
            _ => None,
        };

        let Some(text) = compose(&route, author, candidate.as_deref(), self.settings) else {
            return Ok(Handled::Ignored);
        };

        let outcome = self.dispatcher.dispatch(ReplyDraft {
            parent: item.id.clone(),
            recipient: author.to_string(),
            text,
        });
        Ok(Handled::Replied(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GatewayError, SourceError};
    use crate::testing::{FakeClock, StubGateway, dm, mention};
    use chrono::TimeDelta;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn settings() -> BotSettings {
        BotSettings {
            mention_allowlist: vec!["mhole45".into()],
            ..BotSettings::default()
        }
    }

    fn responder<'a>(
        gw: &'a StubGateway,
        clock: &'a FakeClock,
        settings: &'a BotSettings,
    ) -> Responder<'a, StubGateway, FakeClock> {
        let selector = CandidateSelector::with_rng(
            &settings.referral_subreddit,
            &settings.referral_page,
            StdRng::seed_from_u64(3),
        );
        Responder::with_selector(gw, clock, settings, selector)
    }

    #[test]
    fn referral_request_gets_a_candidate() {
        let clock = FakeClock::default();
        let gw = StubGateway::new()
            .with_wiki("alice\nbob")
            .with_account("newbie", clock.now() - TimeDelta::days(10));
        let s = settings();

        let handled = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "newbie", "PM Referral"))
            .unwrap();

        assert_eq!(handled, Handled::Replied(ReplyOutcome::Sent));
        let sent = gw.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].parent, "t4_1");
        assert!(sent[0].text.contains("alice") || sent[0].text.contains("bob"));
    }

    #[test]
    fn replies_to_the_bot_are_only_logged() {
        let clock = FakeClock::default();
        let gw = StubGateway::new().with_wiki("alice");
        let s = settings();

        let handled = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "newbie", "re: PM Referral"))
            .unwrap();

        assert_eq!(handled, Handled::Acknowledged);
        assert_eq!(gw.send_attempts(), 0);
        assert!(gw.wiki_requests().is_empty());
        assert!(gw.account_lookups().is_empty());
    }

    #[test]
    fn young_accounts_get_nothing() {
        let clock = FakeClock::default();
        let gw = StubGateway::new()
            .with_wiki("alice")
            .with_account("fresh", clock.now() - TimeDelta::hours(23));
        let s = settings();

        let handled = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "fresh", "PM Referral"))
            .unwrap();

        assert_eq!(handled, Handled::TooYoung);
        assert_eq!(gw.send_attempts(), 0);
        assert!(gw.wiki_requests().is_empty());
    }

    #[test]
    fn info_replies_skip_the_referral_list() {
        let clock = FakeClock::default();
        let gw = StubGateway::new().with_account("newbie", clock.now() - TimeDelta::days(2));
        let s = settings();

        let handled = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "newbie", "what is this?"))
            .unwrap();

        assert_eq!(handled, Handled::Replied(ReplyOutcome::Sent));
        assert!(gw.wiki_requests().is_empty());
        assert!(gw.sent()[0].text.contains("I am a bot"));
    }

    #[test]
    fn empty_referral_list_fails_the_item() {
        let clock = FakeClock::default();
        let gw = StubGateway::new()
            .with_wiki("\r\n")
            .with_account("newbie", clock.now() - TimeDelta::days(2));
        let s = settings();

        let err = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "newbie", "PM Referral"))
            .unwrap_err();

        assert!(matches!(err, ResponderError::Source(SourceError::Empty { .. })));
        assert_eq!(gw.send_attempts(), 0);
    }

    #[test]
    fn account_lookup_failure_fails_the_item() {
        let clock = FakeClock::default();
        let gw = StubGateway::new();
        let s = settings();

        let err = responder(&gw, &clock, &s)
            .respond(&dm("t4_1", "ghost", "PM Referral"))
            .unwrap_err();

        assert!(matches!(
            err,
            ResponderError::Gateway(GatewayError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn mentions_are_answered_only_for_allow_listed_authors() {
        let clock = FakeClock::default();
        let gw = StubGateway::new()
            .with_account("MHole45", clock.now() - TimeDelta::days(400))
            .with_account("stranger", clock.now() - TimeDelta::days(400));
        let s = settings();
        let r = responder(&gw, &clock, &s);

        assert_eq!(
            r.respond(&mention("t1_1", "stranger")).unwrap(),
            Handled::Ignored
        );
        assert_eq!(
            r.respond(&mention("t1_2", "MHole45")).unwrap(),
            Handled::Replied(ReplyOutcome::Sent)
        );
        assert_eq!(gw.sent().len(), 1);
        assert_eq!(gw.sent()[0].parent, "t1_2");
    }

    #[test]
    fn authorless_messages_are_ignored() {
        let clock = FakeClock::default();
        let gw = StubGateway::new();
        let s = settings();
        let mut item = dm("t4_1", "x", "PM Referral");
        item.author = None;

        assert_eq!(
            responder(&gw, &clock, &s).respond(&item).unwrap(),
            Handled::Ignored
        );
    }
}
