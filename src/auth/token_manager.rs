use anyhow::Result;
use reqwest::blocking::Client;
use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::auth::oauth::{self, Credentials};

/// Reddit tokens last an hour; refresh a little early.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3500);

struct Cached {
    access_token: String,
    expires_at: Instant,
}

pub struct TokenManager {
    creds: Credentials,
    http: Client,
    cached: RefCell<Option<Cached>>,
}

impl TokenManager {
    pub fn new(creds: Credentials, user_agent: &str) -> Result<Self> {
        Ok(Self {
            creds,
            http: oauth::token_client(user_agent)?,
            cached: RefCell::new(None),
        })
    }

    pub fn username(&self) -> &str {
        &self.creds.username
    }

    /// Returns a valid access token; runs the password grant if the cached one is stale.
    pub fn get_access_token(&self) -> Result<String> {
        let now = Instant::now();

        if let Some(c) = self.cached.borrow().as_ref()
            && now + EXPIRY_MARGIN < c.expires_at
        {
            return Ok(c.access_token.clone());
        }

        let t = oauth::password_grant(&self.creds, &self.http)?;
        let lifetime = t
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LIFETIME);
        log::debug!("obtained access token for u/{}", self.creds.username);

        *self.cached.borrow_mut() = Some(Cached {
            access_token: t.access_token.clone(),
            expires_at: now + lifetime,
        });
        Ok(t.access_token)
    }

    /// Drop the cached token, e.g. after reddit answers 401.
    pub fn invalidate(&self) {
        self.cached.borrow_mut().take();
    }
}
