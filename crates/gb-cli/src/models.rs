use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const USER_STATE_SCHEMA: &str = "user-state.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub schema_version: String,
    pub user_id: String,
    pub tappable: Vec<String>,
}

impl UserState {
    pub fn empty(user_id: &str) -> Self {
        Self {
            schema_version: USER_STATE_SCHEMA.to_string(),
            user_id: user_id.to_string(),
            tappable: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Follow,
    Message { text: String },
    Postback { data: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackAction {
    pub label: String,
    pub data: String,
    pub display_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Buttons {
        alt_text: String,
        prompt: String,
        actions: Vec<PostbackAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMessage {
    pub delay: Duration,
    pub message: OutboundMessage,
}

impl ScheduledMessage {
    pub fn delay_ms(&self) -> u128 {
        self.delay.as_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered {
        messages: usize,
        tappable: Vec<String>,
    },
    Ignored {
        reason: String,
    },
}
