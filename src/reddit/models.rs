//! Wire shapes of the reddit JSON responses we read.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::inbox::{InboxItem, ItemKind};
use crate::error::SendError;

#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct MessageData {
    pub name: String,
    pub author: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub was_comment: bool,
}

impl From<Thing<MessageData>> for InboxItem {
    fn from(thing: Thing<MessageData>) -> Self {
        let d = thing.data;
        let kind = match thing.kind.as_str() {
            "t4" => ItemKind::DirectMessage,
            "t1" if d.was_comment && d.subject == "username mention" => ItemKind::CommentMention,
            _ => ItemKind::Other,
        };
        let author = d
            .author
            .filter(|a| !a.is_empty() && a != "[deleted]");

        InboxItem {
            id: d.name,
            kind,
            author,
            subject: d.subject,
            body: d.body,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WikiPage {
    pub data: WikiPageData,
}

#[derive(Debug, Deserialize)]
pub struct WikiPageData {
    pub content_md: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountAbout {
    pub data: AccountData,
}

#[derive(Debug, Deserialize)]
pub struct AccountData {
    pub created_utc: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub json: ApiEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub errors: Vec<Vec<Value>>,
}

/// Maps the `json.errors` array of an `api_type=json` response to a send error.
/// Entries look like `["RATELIMIT", "you are doing that too much", "ratelimit"]`.
pub fn send_error_from(errors: &[Vec<Value>]) -> Option<SendError> {
    let first = errors.first()?;
    let code = first.first().and_then(Value::as_str).unwrap_or("UNKNOWN");
    let message = first.get(1).and_then(Value::as_str).unwrap_or_default();
    let text = format!("{code}: {message}");

    if code == "RATELIMIT" {
        Some(SendError::RateLimited(text))
    } else {
        Some(SendError::Api(text))
    }
}
