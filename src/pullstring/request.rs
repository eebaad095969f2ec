//! Request bodies for the Conversation API.
//!
//! Both bodies serialize only the fields that were actually supplied;
//! absent optional parameters must not appear as keys at all, not even as
//! null. The field names are fixed by the service and must not change.

use super::Entities;
use serde::Serialize;

/// Body of `POST /conversation`: create a new conversation.
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    /// Project identifier, an opaque key into the remote system.
    pub project: String,
    /// Minutes offset from UTC of the participant's clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_offset: Option<i32>,
    /// Participant identifier for cross-device continuity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    /// Which build of the project content to run (e.g. "sandbox").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
}

impl StartRequest {
    /// A start request carrying only the mandatory project identifier.
    #[must_use]
    pub const fn new(project: String) -> Self {
        Self {
            project,
            time_zone_offset: None,
            participant: None,
            build_type: None,
        }
    }
}

/// A named event with a parameter mapping, fired into a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Event name as authored in the project content.
    pub name: String,
    /// Event parameters; the project content defines the expected keys.
    pub parameters: Entities,
}

/// Body of `POST /conversation/{uuid}`: one turn against an existing
/// conversation.
///
/// The constructors mirror the operations of the API: [`TurnRequest::say`],
/// [`TurnRequest::change`], [`TurnRequest::fire`], [`TurnRequest::get`],
/// [`TurnRequest::set`] each populate exactly one field. A default request
/// (all fields absent) asks the bot to speak next, which is how a timed
/// continuation and a session resume are expressed on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnRequest {
    /// User utterance to interpret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Activity to switch the conversation to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Event to fire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    /// Entity values to write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_entities: Option<Entities>,
    /// Entity names to read back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_entities: Option<Vec<String>>,
    /// Language override for interpretation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Locale override for interpretation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Restart the conversation if the project content changed. The service
    /// spells this one in camelCase.
    #[serde(
        rename = "restartIfModified",
        skip_serializing_if = "Option::is_none"
    )]
    pub restart_if_modified: Option<bool>,
}

impl TurnRequest {
    /// Say something to the bot. `None` asks the bot to speak next without
    /// user input (resume, timed continuation).
    #[must_use]
    pub fn say(text: Option<String>) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    /// Change the conversation's current activity.
    #[must_use]
    pub fn change(activity: String) -> Self {
        Self {
            activity: Some(activity),
            ..Self::default()
        }
    }

    /// Fire a named event.
    #[must_use]
    pub fn fire(event: Event) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    /// Read entity values back from the conversation.
    #[must_use]
    pub fn get(entities: Vec<String>) -> Self {
        Self {
            get_entities: Some(entities),
            ..Self::default()
        }
    }

    /// Write entity values into the conversation.
    #[must_use]
    pub fn set(entities: Entities) -> Self {
        Self {
            set_entities: Some(entities),
            ..Self::default()
        }
    }
}
