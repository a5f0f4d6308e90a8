//! Inbound bot events.
//!
//! The wire types mirror the subset of the Telegram `Update` object this bot
//! reads; anything else in the payload is ignored. [`Update`] is the
//! normalized form handed to the router.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    callback_query: Option<RawCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    chat: Option<RawChat>,
    #[serde(default)]
    from: Option<RawUser>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCallbackQuery {
    #[serde(default)]
    from: Option<RawUser>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: i64,
}

/// One inbound event reported by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub id: i64,
    pub kind: UpdateKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    Message(IncomingMessage),
    Callback(CallbackEvent),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: Option<i64>,
    pub sender_id: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub sender_id: Option<i64>,
    pub data: Option<String>,
}

impl IncomingMessage {
    /// Chat to reply into: the message's chat, else the sender's private chat.
    pub fn reply_target(&self) -> Option<i64> {
        self.chat_id.or(self.sender_id)
    }
}

impl Update {
    /// Decode an already-parsed JSON payload.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: RawUpdate = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    pub fn message(&self) -> Option<&IncomingMessage> {
        match &self.kind {
            UpdateKind::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Message text, if this update is a message carrying text.
    pub fn text(&self) -> Option<&str> {
        self.message().and_then(|m| m.text.as_deref())
    }
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        let kind = match (raw.message, raw.callback_query) {
            (Some(message), _) => UpdateKind::Message(IncomingMessage {
                chat_id: message.chat.map(|c| c.id),
                sender_id: message.from.map(|u| u.id),
                text: message.text,
            }),
            (None, Some(query)) => UpdateKind::Callback(CallbackEvent {
                sender_id: query.from.map(|u| u.id),
                data: query.data,
            }),
            (None, None) => UpdateKind::Other,
        };

        Self {
            id: raw.update_id,
            kind,
        }
    }
}
