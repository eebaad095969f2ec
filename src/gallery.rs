//! Bot list retrieval via the ConfigBot convention.
//!
//! A fixed administrative bot answers the literal utterance `"bots"` with
//! one output line per available bot, formatted as comma-separated
//! `name, projectID`. The delimiter, field order and whitespace trimming
//! are load-bearing: the backend content is authored against exactly this
//! convention.

use crate::config::Settings;
use crate::pullstring::{Bot, ConversationApi, ConversationError, TurnResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// Display name of the administrative bot.
pub const CONFIG_BOT_NAME: &str = "ConfigBot";

/// The utterance that makes the ConfigBot enumerate the gallery.
pub const LIST_UTTERANCE: &str = "bots";

/// One entry of the bot list, before it becomes a [`Bot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotListing {
    /// Display name.
    pub name: String,
    /// Project identifier.
    pub project_id: String,
}

/// Parse one ConfigBot output line. Lines with fewer than two
/// comma-separated fields are dropped, not errors.
#[must_use]
pub fn parse_bot_line(line: &str) -> Option<BotListing> {
    let mut fields = line.splitn(3, ',');
    let name = fields.next()?.trim();
    let project_id = fields.next()?.trim();
    if name.is_empty() || project_id.is_empty() {
        return None;
    }
    Some(BotListing {
        name: name.to_string(),
        project_id: project_id.to_string(),
    })
}

/// Collect bot listings from a turn response's text outputs.
#[must_use]
pub fn parse_bot_list(response: &TurnResponse) -> Vec<BotListing> {
    response
        .outputs
        .iter()
        .filter_map(|output| output.text.as_deref())
        .filter_map(parse_bot_line)
        .collect()
}

/// Ask the ConfigBot for the gallery and build a [`Bot`] per listing, all
/// sharing the deployment's API key.
///
/// # Errors
///
/// Returns `ConversationError::MissingConfig` when the deployment's API
/// key or the ConfigBot project id is absent, the client's error if the
/// start or list turn fails, or `ConversationError::Api` if the start
/// response carried no conversation identifier to address the list turn
/// at.
pub async fn fetch_bot_list(
    api: Arc<dyn ConversationApi>,
    settings: &Settings,
) -> Result<Vec<Bot>, ConversationError> {
    if settings.web_api_key.is_empty() {
        return Err(ConversationError::MissingConfig("web_api_key".to_string()));
    }
    if settings.config_bot_project_id.is_empty() {
        return Err(ConversationError::MissingConfig(
            "config_bot_project_id".to_string(),
        ));
    }

    let mut config_bot = Bot::new(
        api.clone(),
        CONFIG_BOT_NAME,
        settings.config_bot_project_id.clone(),
        settings.web_api_key.clone(),
    );

    let started = config_bot.start_conversation(&settings.start_options()).await?;
    config_bot.adopt_conversation(&started);
    debug!(active = config_bot.is_active(), "ConfigBot session started");

    let uuid = config_bot.conversation.clone().ok_or_else(|| {
        ConversationError::Api("ConfigBot start response carried no conversation id".to_string())
    })?;

    let response = config_bot
        .say(&uuid, Some(LIST_UTTERANCE.to_string()))
        .await?;

    let listings = parse_bot_list(&response);
    if listings.is_empty() {
        warn!("ConfigBot returned no parsable bot listings");
    }

    Ok(listings
        .into_iter()
        .map(|listing| {
            Bot::new(
                api.clone(),
                listing.name,
                listing.project_id,
                settings.web_api_key.clone(),
            )
        })
        .collect())
}
