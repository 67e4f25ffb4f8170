use crate::config::BotSettings;
use crate::domain::inbox::{InboxItem, ItemKind};

/// Which reply an inbound item gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Referral,
    /// A reply to something the bot sent. Logged, never answered.
    Acknowledge,
    /// Exact-subject match from `canned_replies`; holds the template.
    Canned(String),
    Mention,
    Info,
}

/// Routes a message subject. The reply indicator is checked first so the bot
/// never answers its own conversations, even when the rest of the subject
/// would match the referral token.
pub fn classify_subject(subject: &str, settings: &BotSettings) -> Route {
    if subject.contains(settings.reply_indicator.as_str()) {
        Route::Acknowledge
    } else if subject == settings.referral_subject {
        Route::Referral
    } else if let Some(template) = settings.canned_replies.get(subject) {
        Route::Canned(template.clone())
    } else {
        Route::Info
    }
}

pub fn route_for(item: &InboxItem, settings: &BotSettings) -> Route {
    match item.kind {
        ItemKind::CommentMention => Route::Mention,
        _ => classify_subject(&item.subject, settings),
    }
}
