//! Reply texts. Links are plain string construction, no network involved.

use url::form_urlencoded;

use crate::config::BotSettings;
use crate::responder::classify::Route;

const COMPOSE_URL: &str = "https://www.reddit.com/message/compose/";
const REFERRAL_INFO_LINK: &str =
    "https://productioncommunity.publicmobile.ca/t5/Rewards/Refer-a-Friend-Reward/m-p/411#M4";

fn compose_link(to: &str, subject: &str, message: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("to", to)
        .append_pair("subject", subject)
        .append_pair("message", message)
        .finish();
    format!("{COMPOSE_URL}?{query}")
}

/// Pre-filled message from the user to the referrer.
pub fn referrer_link(referrer: &str) -> String {
    compose_link(
        referrer,
        "PM Mobile Referral",
        &format!(
            "Hello {referrer}! The PM Referral Bot directed me to you. Thanks for the referral number!"
        ),
    )
}

/// Pre-filled referral request addressed to the bot itself.
pub fn bot_link(settings: &BotSettings) -> String {
    compose_link(
        &format!("/u/{}", settings.bot_username),
        &settings.referral_subject,
        "Referral Please",
    )
}

/// Reply text for `route`. `None` when the route produces no message, which is
/// always the case for [`Route::Acknowledge`] and for a referral without a candidate.
pub fn compose(
    route: &Route,
    user: &str,
    candidate: Option<&str>,
    settings: &BotSettings,
) -> Option<String> {
    let greeting = format!("Hello {user}!");
    match route {
        Route::Acknowledge => None,
        Route::Referral => {
            let referrer = candidate?;
            Some(format!(
                "{greeting} Thanks for showing interest in Public Mobile. When signing up, \
                 you can get a referral number from {referrer}. Click [here]({link}) to message \
                 {referrer}. \n\n Alternatively, click [here]({REFERRAL_INFO_LINK}) to get more \
                 information on how referrals work.",
                link = referrer_link(referrer),
            ))
        }
        Route::Info => Some(format!(
            "{greeting} I am a bot that can help you get a referral number for Public Mobile. \
             We have a list of Public Mobile users who are happy to have their number used for \
             referrals. If you want to get a referral number, send me a message with \"{subject}\" \
             as the subject or alternatively click [here]({link}).",
            subject = settings.referral_subject,
            link = bot_link(settings),
        )),
        Route::Mention => Some(format!(
            "{greeting} Thanks for the mention. If you are looking for a Public Mobile referral \
             number, click [here]({link}) to ask me for one.",
            link = bot_link(settings),
        )),
        Route::Canned(template) => Some(template.replace("{user}", user)),
    }
}
