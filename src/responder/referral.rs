//! Picks a referrer from the community-maintained wiki list.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::cell::RefCell;
use std::sync::LazyLock;

use crate::error::SourceError;
use crate::reddit::Gateway;

/// Any run of CR/LF is one separator, so blank lines never yield empty entries.
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("line break pattern is valid"));

pub fn parse_referrers(raw: &str) -> Vec<String> {
    LINE_BREAKS
        .split(raw)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct CandidateSelector {
    subreddit: String,
    page: String,
    rng: RefCell<StdRng>,
}

impl CandidateSelector {
    pub fn new(subreddit: impl Into<String>, page: impl Into<String>) -> Self {
        Self::with_rng(subreddit, page, StdRng::from_entropy())
    }

    pub fn with_rng(subreddit: impl Into<String>, page: impl Into<String>, rng: StdRng) -> Self {
        Self {
            subreddit: subreddit.into(),
            page: page.into(),
            rng: RefCell::new(rng),
        }
    }

    /// Uniform pick; `None` only for an empty list.
    pub fn choose<'l>(&self, referrers: &'l [String]) -> Option<&'l str> {
        referrers
            .choose(&mut *self.rng.borrow_mut())
            .map(String::as_str)
    }

    /// Fetches the list fresh and picks one referrer. Nothing is cached between calls.
    pub fn select(&self, gateway: &impl Gateway) -> Result<String, SourceError> {
        let raw = gateway.fetch_wiki_page(&self.subreddit, &self.page)?;
        let referrers = parse_referrers(&raw);
        log::debug!(
            "r/{}/wiki/{} lists {} referrers",
            self.subreddit,
            self.page,
            referrers.len()
        );

        self.choose(&referrers)
            .map(str::to_string)
            .ok_or_else(|| SourceError::Empty {
                subreddit: self.subreddit.clone(),
                page: self.page.clone(),
            })
    }
}
