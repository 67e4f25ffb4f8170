pub mod client;
pub mod models;

use chrono::{DateTime, Utc};

use crate::domain::inbox::{InboxItem, ReplyDraft};
use crate::error::{GatewayError, SendError};

pub use client::RedditClient;

/// The slice of the reddit API the bot depends on.
pub trait Gateway {
    /// Unread inbox items, in the order reddit returns them. Does not mark them read.
    fn fetch_unread(&self, limit: usize) -> Result<Vec<InboxItem>, GatewayError>;

    fn mark_read(&self, item: &InboxItem) -> Result<(), GatewayError>;

    fn send_reply(&self, draft: &ReplyDraft) -> Result<(), SendError>;

    /// Raw markdown of a wiki page.
    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<String, GatewayError>;

    fn fetch_account_created(&self, author: &str) -> Result<DateTime<Utc>, GatewayError>;
}
