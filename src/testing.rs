//! Scripted gateway and clock for unit tests.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::clock::Clock;
use crate::domain::inbox::{InboxItem, ItemKind, ReplyDraft};
use crate::error::{GatewayError, SendError};
use crate::reddit::Gateway;

pub fn dm(id: &str, author: &str, subject: &str) -> InboxItem {
    InboxItem {
        id: id.to_string(),
        kind: ItemKind::DirectMessage,
        author: Some(author.to_string()),
        subject: subject.to_string(),
        body: "Referral Please".to_string(),
    }
}

pub fn mention(id: &str, author: &str) -> InboxItem {
    InboxItem {
        id: id.to_string(),
        kind: ItemKind::CommentMention,
        author: Some(author.to_string()),
        subject: "username mention".to_string(),
        body: "u/PMReferralBot".to_string(),
    }
}

pub struct FakeClock {
    now: DateTime<Utc>,
    sleeps: RefCell<Vec<Duration>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            now: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            sleeps: RefCell::new(Vec::new()),
        }
    }
}

impl FakeClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sleep(&self, dur: Duration) {
        self.sleeps.borrow_mut().push(dur);
    }
}

/// Unread batches and send results are consumed in order; once a script runs
/// out, fetches return an empty inbox and sends succeed.
pub struct StubGateway {
    unread: RefCell<VecDeque<Result<Vec<InboxItem>, GatewayError>>>,
    send_results: RefCell<VecDeque<Result<(), SendError>>>,
    /// Page content, or the HTTP status to fail with.
    wiki: Result<String, u16>,
    accounts: HashMap<String, DateTime<Utc>>,

    send_attempts: RefCell<usize>,
    sent: RefCell<Vec<ReplyDraft>>,
    read: RefCell<Vec<String>>,
    wiki_requests: RefCell<Vec<(String, String)>>,
    account_lookups: RefCell<Vec<String>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            unread: RefCell::new(VecDeque::new()),
            send_results: RefCell::new(VecDeque::new()),
            wiki: Err(404),
            accounts: HashMap::new(),
            send_attempts: RefCell::new(0),
            sent: RefCell::new(Vec::new()),
            read: RefCell::new(Vec::new()),
            wiki_requests: RefCell::new(Vec::new()),
            account_lookups: RefCell::new(Vec::new()),
        }
    }

    pub fn with_unread(self, batch: Result<Vec<InboxItem>, GatewayError>) -> Self {
        self.unread.borrow_mut().push_back(batch);
        self
    }

    pub fn with_send_results(self, results: Vec<Result<(), SendError>>) -> Self {
        self.send_results.borrow_mut().extend(results);
        self
    }

    pub fn with_wiki(mut self, content: &str) -> Self {
        self.wiki = Ok(content.to_string());
        self
    }

    pub fn with_wiki_status(mut self, status: u16) -> Self {
        self.wiki = Err(status);
        self
    }

    pub fn with_account(mut self, name: &str, created: DateTime<Utc>) -> Self {
        self.accounts.insert(name.to_string(), created);
        self
    }

    pub fn send_attempts(&self) -> usize {
        *self.send_attempts.borrow()
    }

    pub fn sent(&self) -> Vec<ReplyDraft> {
        self.sent.borrow().clone()
    }

    pub fn read_ids(&self) -> Vec<String> {
        self.read.borrow().clone()
    }

    pub fn wiki_requests(&self) -> Vec<(String, String)> {
        self.wiki_requests.borrow().clone()
    }

    pub fn account_lookups(&self) -> Vec<String> {
        self.account_lookups.borrow().clone()
    }
}

impl Gateway for StubGateway {
    fn fetch_unread(&self, limit: usize) -> Result<Vec<InboxItem>, GatewayError> {
        match self.unread.borrow_mut().pop_front() {
            Some(Ok(mut items)) => {
                items.truncate(limit);
                Ok(items)
            }
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    fn mark_read(&self, item: &InboxItem) -> Result<(), GatewayError> {
        self.read.borrow_mut().push(item.id.clone());
        Ok(())
    }

    fn send_reply(&self, draft: &ReplyDraft) -> Result<(), SendError> {
        *self.send_attempts.borrow_mut() += 1;
        let result = self.send_results.borrow_mut().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.sent.borrow_mut().push(draft.clone());
        }
        result
    }

    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<String, GatewayError> {
        self.wiki_requests
            .borrow_mut()
            .push((subreddit.to_string(), page.to_string()));
        self.wiki.clone().map_err(|status| GatewayError::Status {
            status,
            body: "wiki page unavailable".to_string(),
        })
    }

    fn fetch_account_created(&self, author: &str) -> Result<DateTime<Utc>, GatewayError> {
        self.account_lookups.borrow_mut().push(author.to_string());
        self.accounts
            .get(author)
            .copied()
            .ok_or_else(|| GatewayError::Status {
                status: 404,
                body: format!("u/{author} not found"),
            })
    }
}
