use std::io::Write;

use gb_core::GamebookError;

use crate::{map_cli_encode, map_cli_io, OutboundMessage, ScheduledMessage};

pub trait MessagingClient {
    fn push(&mut self, user_id: &str, message: &ScheduledMessage) -> Result<(), GamebookError>;
}

pub struct StdoutClient<W: Write> {
    out: W,
}

impl<W: Write> StdoutClient<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessagingClient for StdoutClient<W> {
    fn push(&mut self, _user_id: &str, message: &ScheduledMessage) -> Result<(), GamebookError> {
        let tag = match message.message {
            OutboundMessage::Text { .. } => "TEXT_JSON",
            OutboundMessage::Buttons { .. } => "BUTTONS_JSON",
        };
        let payload = serde_json::to_string(&message.message).map_err(map_cli_encode)?;
        writeln!(self.out, "PUSH:{}|{}:{}", message.delay_ms(), tag, payload).map_err(map_cli_io)
    }
}
