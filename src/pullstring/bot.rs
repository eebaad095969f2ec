//! Per-bot session state.
//!
//! A [`Bot`] owns the identity of one conversational agent plus the state
//! of its current session: the server-issued conversation identifier and
//! the active flag. The remote service holds all dialogue state, so this
//! is deliberately thin.
//!
//! No per-conversation serialization happens here. One screen drives one
//! bot at a time; if two turns for the same conversation are ever issued
//! concurrently, their completions may land in either order and the last
//! write to the session fields wins.

use super::{
    ConversationApi, ConversationError, Entities, Event, StartRequest, TurnRequest, TurnResponse,
};
use std::sync::Arc;
use tracing::debug;

/// Optional fields of a session start, supplied from configuration.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// Minutes offset from UTC of the participant's clock.
    pub time_zone_offset: Option<i32>,
    /// Participant identifier for cross-device continuity.
    pub participant: Option<String>,
    /// Which build of the project content to run.
    pub build_type: Option<String>,
}

/// One conversational agent and its current session.
pub struct Bot {
    api: Arc<dyn ConversationApi>,
    /// Display name.
    pub name: String,
    /// Project identifier, an opaque key into the remote system.
    pub project_id: String,
    api_key: String,
    /// Identifier of the current conversation, once a session has started
    /// and the caller adopted it from a turn response.
    pub conversation: Option<String>,
    active: bool,
}

impl Bot {
    /// Create a bot with no session.
    pub fn new(
        api: Arc<dyn ConversationApi>,
        name: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            api,
            name: name.into(),
            project_id: project_id.into(),
            api_key: api_key.into(),
            conversation: None,
            active: false,
        }
    }

    /// Whether a session has started successfully and not been reset.
    ///
    /// The flag tracks the outcome of the start call, not the presence of
    /// a conversation identifier in the response. Known looseness in the
    /// product behavior; kept as-is.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start a new conversation for this bot's project.
    ///
    /// The conversation identifier is NOT captured here; read it from the
    /// returned response and hand it back via [`Bot::adopt_conversation`].
    ///
    /// # Errors
    ///
    /// Propagates the client's error; on error the active flag is false.
    pub async fn start_conversation(
        &mut self,
        options: &StartOptions,
    ) -> Result<TurnResponse, ConversationError> {
        let request = StartRequest {
            time_zone_offset: options.time_zone_offset,
            participant: options.participant.clone(),
            build_type: options.build_type.clone(),
            ..StartRequest::new(self.project_id.clone())
        };

        let result = self.api.start(&self.api_key, &request).await;
        self.active = result.is_ok();
        debug!(bot = %self.name, active = self.active, "start conversation");
        result
    }

    /// Record the conversation identifier carried by a turn response,
    /// replacing the current one (including with absence).
    pub fn adopt_conversation(&mut self, response: &TurnResponse) {
        self.conversation = response.conversation.clone();
    }

    /// Issue a generic turn against an existing conversation.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn converse(
        &self,
        uuid: &str,
        request: &TurnRequest,
    ) -> Result<TurnResponse, ConversationError> {
        self.api.converse(&self.api_key, uuid, request).await
    }

    /// Say something to the bot; `None` asks the bot to speak next.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn say(
        &self,
        uuid: &str,
        text: Option<String>,
    ) -> Result<TurnResponse, ConversationError> {
        self.converse(uuid, &TurnRequest::say(text)).await
    }

    /// Switch the conversation to another activity.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn change(
        &self,
        uuid: &str,
        activity: String,
    ) -> Result<TurnResponse, ConversationError> {
        self.converse(uuid, &TurnRequest::change(activity)).await
    }

    /// Fire a named event into the conversation.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn fire(&self, uuid: &str, event: Event) -> Result<TurnResponse, ConversationError> {
        self.converse(uuid, &TurnRequest::fire(event)).await
    }

    /// Read entity values back from the conversation.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn get(
        &self,
        uuid: &str,
        entities: Vec<String>,
    ) -> Result<TurnResponse, ConversationError> {
        self.converse(uuid, &TurnRequest::get(entities)).await
    }

    /// Write entity values into the conversation.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub async fn set(
        &self,
        uuid: &str,
        entities: Entities,
    ) -> Result<TurnResponse, ConversationError> {
        self.converse(uuid, &TurnRequest::set(entities)).await
    }
}
