//! Console event handler used by the command-line demo

use crate::broker::ShutdownSignal;
use crate::handler::EventHandler;
use crate::message::{MessageData, MessageKind};
use colored::*;
use std::io::Write;

/// Prints every surfaced event as one line
pub struct ConsoleEventHandler<W: Write> {
    writer: W,
    color: bool,
    messages: usize,
    disconnects: usize,
}

impl<W: Write> ConsoleEventHandler<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self {
            writer,
            color,
            messages: 0,
            disconnects: 0,
        }
    }

    pub fn messages(&self) -> usize {
        self.messages
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: String) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            log::warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> EventHandler for ConsoleEventHandler<W> {
    fn on_message_received(&mut self, message: MessageData) {
        self.messages += 1;

        let body = message.body();
        let sender = body.sender.as_deref().unwrap_or("anonymous");
        let timestamp = body
            .sent_at
            .map(|t| format!("{} ", t.format("%H:%M:%S")))
            .unwrap_or_default();

        let line = match (message.kind(), self.color) {
            (MessageKind::Text, true) => {
                format!("{}{}: {}", timestamp.dimmed(), sender.bold(), body.content)
            }
            (MessageKind::Text, false) => format!("{}{}: {}", timestamp, sender, body.content),
            (MessageKind::Notice, true) => {
                format!("{}* {}", timestamp.dimmed(), body.content.italic())
            }
            (MessageKind::Notice, false) => format!("{}* {}", timestamp, body.content),
        };
        self.write_line(line);
    }

    fn on_disconnect(&mut self, signal: ShutdownSignal) {
        self.disconnects += 1;

        let line = if self.color {
            format!("{} {}", "disconnected:".red().bold(), signal.reason)
        } else {
            format!("disconnected: {}", signal.reason)
        };
        self.write_line(line);
    }
}
