use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::auth::token_manager::TokenManager;
use crate::domain::inbox::{InboxItem, ReplyDraft};
use crate::error::{GatewayError, SendError};
use crate::reddit::Gateway;
use crate::reddit::models::{
    AccountAbout, ApiResponse, Listing, MessageData, WikiPage, send_error_from,
};

const API_BASE: &str = "https://oauth.reddit.com";

pub struct RedditClient {
    http: Client,
    tokens: TokenManager,
}

impl RedditClient {
    pub fn new(tokens: TokenManager, user_agent: &str) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, tokens })
    }

    pub fn username(&self) -> &str {
        self.tokens.username()
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        let token = self
            .tokens
            .get_access_token()
            .map_err(|e| GatewayError::Auth(format!("{e:#}")))?;
        Ok(req.bearer_auth(token).query(&[("raw_json", "1")]))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let req = self.authed(self.http.get(format!("{API_BASE}{path}")).query(query))?;
        let resp = req.send()?;
        self.decode(resp)
    }

    fn decode<T: DeserializeOwned>(&self, resp: Response) -> Result<T, GatewayError> {
        let resp = self.check_status(resp)?;
        resp.json::<T>()
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn check_status(&self, resp: Response) -> Result<Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate();
        }
        let body = resp.text().unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Gateway for RedditClient {
    fn fetch_unread(&self, limit: usize) -> Result<Vec<InboxItem>, GatewayError> {
        let limit = limit.to_string();
        let listing: Listing<MessageData> = self.get_json(
            "/message/unread",
            &[("limit", limit.as_str()), ("mark", "false")],
        )?;
        Ok(listing.data.children.into_iter().map(Into::into).collect())
    }

    fn mark_read(&self, item: &InboxItem) -> Result<(), GatewayError> {
        let req = self.authed(
            self.http
                .post(format!("{API_BASE}/api/read_message"))
                .form(&[("id", item.id.as_str())]),
        )?;
        self.check_status(req.send()?)?;
        Ok(())
    }

    fn send_reply(&self, draft: &ReplyDraft) -> Result<(), SendError> {
        let req = self
            .authed(self.http.post(format!("{API_BASE}/api/comment")).form(&[
                ("api_type", "json"),
                ("thing_id", draft.parent.as_str()),
                ("text", draft.text.as_str()),
            ]))
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let resp = req
            .send()
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SendError::RateLimited(format!("HTTP {status}")));
        }
        if status.is_client_error() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate();
            }
            let body = resp.text().unwrap_or_default();
            return Err(SendError::Client(format!("HTTP {status}: {body}")));
        }
        if !status.is_success() {
            return Err(SendError::Transport(format!("HTTP {status}")));
        }

        let body: ApiResponse = resp
            .json()
            .map_err(|e| SendError::Transport(format!("undecodable reply response: {e}")))?;
        match send_error_from(&body.json.errors) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<String, GatewayError> {
        let wiki: WikiPage = self.get_json(&format!("/r/{subreddit}/wiki/{page}"), &[])?;
        Ok(wiki.data.content_md)
    }

    fn fetch_account_created(&self, author: &str) -> Result<DateTime<Utc>, GatewayError> {
        let about: AccountAbout = self.get_json(&format!("/user/{author}/about"), &[])?;
        DateTime::from_timestamp(about.data.created_utc as i64, 0).ok_or_else(|| {
            GatewayError::Decode(format!(
                "u/{author} has out-of-range created_utc {}",
                about.data.created_utc
            ))
        })
    }
}
