use anyhow::{Context, Result, anyhow};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::oauth::Credentials;
use crate::auth::token_store::{self, SecretKind};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub client_id: String,
    pub username: String,
    pub user_agent: Option<String>,
    pub bot_username: Option<String>,

    pub batch_size: Option<usize>,
    pub poll_interval_secs: Option<u64>,
    pub retry_backoff_secs: Option<u64>,
    pub min_account_age_hours: Option<i64>,

    pub referral_subject: Option<String>,
    pub reply_indicator: Option<String>,
    pub referral_subreddit: Option<String>,
    pub referral_page: Option<String>,

    pub mention_allowlist: Vec<String>,
    /// Exact subject -> reply template (`{user}` is substituted).
    pub canned_replies: BTreeMap<String, String>,
}

/// Runtime knobs derived from [`Config`].
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub batch_size: usize,
    pub poll_interval: Duration,
    pub retry_backoff: Duration,
    pub min_account_age: TimeDelta,
    pub referral_subject: String,
    pub reply_indicator: String,
    pub referral_subreddit: String,
    pub referral_page: String,
    pub bot_username: String,
    pub mention_allowlist: Vec<String>,
    pub canned_replies: BTreeMap<String, String>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            poll_interval: Duration::from_secs(30),
            retry_backoff: Duration::from_secs(10),
            min_account_age: TimeDelta::days(1),
            referral_subject: "PM Referral".to_string(),
            reply_indicator: "re:".to_string(),
            referral_subreddit: "PublicMobile".to_string(),
            referral_page: "referrals".to_string(),
            bot_username: "PMReferralBot".to_string(),
            mention_allowlist: Vec::new(),
            canned_replies: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn settings(&self) -> Result<BotSettings> {
        let d = BotSettings::default();
        let min_account_age = match self.min_account_age_hours {
            Some(h) => TimeDelta::try_hours(h)
                .ok_or_else(|| anyhow!("min_account_age_hours = {h} is out of range"))?,
            None => d.min_account_age,
        };
        Ok(BotSettings {
            batch_size: self.batch_size.unwrap_or(d.batch_size),
            poll_interval: self
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(d.poll_interval),
            retry_backoff: self
                .retry_backoff_secs
                .map(Duration::from_secs)
                .unwrap_or(d.retry_backoff),
            min_account_age,
            referral_subject: self.referral_subject.clone().unwrap_or(d.referral_subject),
            reply_indicator: self.reply_indicator.clone().unwrap_or(d.reply_indicator),
            referral_subreddit: self
                .referral_subreddit
                .clone()
                .unwrap_or(d.referral_subreddit),
            referral_page: self.referral_page.clone().unwrap_or(d.referral_page),
            bot_username: self
                .bot_username
                .clone()
                .unwrap_or_else(|| self.username.clone()),
            mention_allowlist: self.mention_allowlist.clone(),
            canned_replies: self.canned_replies.clone(),
        })
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| "PM Bot".to_string())
    }

    /// Client secret and password: environment first, then the keyring.
    pub fn credentials(&self) -> Result<Credentials> {
        let client_secret = match std::env::var("CLIENT_SECRET").ok() {
            Some(s) => s,
            None => token_store::load_secret(SecretKind::ClientSecret, &self.client_id)?
                .ok_or_else(|| {
                    anyhow!(
                        "no client secret: set CLIENT_SECRET or run `set-secret --kind client-secret --key {}`",
                        self.client_id
                    )
                })?,
        };
        let password = match std::env::var("REDDIT_PASSWORD").ok() {
            Some(s) => s,
            None => token_store::load_secret(SecretKind::Password, &self.username)?
                .ok_or_else(|| {
                    anyhow!(
                        "no password: set REDDIT_PASSWORD or run `set-secret --kind password --key {}`",
                        self.username
                    )
                })?,
        };

        Ok(Credentials {
            client_id: self.client_id.clone(),
            client_secret,
            username: self.username.clone(),
            password,
        })
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(id) = env("CLIENT_ID") {
            self.client_id = id;
        }
        if let Some(user) = env("REDDIT_USERNAME") {
            self.username = user;
        }
    }

    fn has_identity(&self) -> bool {
        !self.client_id.is_empty() && !self.username.is_empty()
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow!("no config dir available"))?
        .join("pm_referral_bot"))
}

pub fn default_config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    load_config_with_env(&path, |k| std::env::var(k).ok())
}

fn load_config_with_env(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut cfg = if path.exists() {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str::<Config>(&s).with_context(|| format!("parsing {}", path.display()))?
    } else {
        Config::default()
    };
    cfg.apply_env(env);

    if cfg.has_identity() {
        return Ok(cfg);
    }

    if !path.exists() {
        // create a template config for operators to edit
        let sample = Config {
            client_id: "YOUR_SCRIPT_APP_CLIENT_ID".to_string(),
            username: "PMReferralBot".to_string(),
            user_agent: Some("PM Bot".to_string()),
            ..Config::default()
        };
        fs::write(path, toml::to_string_pretty(&sample)?)?;
        return Err(anyhow!(
            "Created template config at {}, edit it and run again",
            path.display()
        ));
    }
    Err(anyhow!(
        "{} must set client_id and username (or CLIENT_ID / REDDIT_USERNAME)",
        path.display()
    ))
}
