/// Reddit "fullname" of an inbox thing, e.g. `t4_abc123`.
pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    DirectMessage,
    CommentMention,
    Other,
}

#[derive(Debug, Clone)]
pub struct InboxItem {
    pub id: ItemId,
    pub kind: ItemKind,
    /// `None` for deleted accounts and system notices.
    pub author: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Composed outbound text, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    pub parent: ItemId,
    pub recipient: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Sent,
    SentAfterRetry,
    Dropped(String),
}

impl ReplyOutcome {
    pub fn delivered(&self) -> bool {
        !matches!(self, ReplyOutcome::Dropped(_))
    }
}
