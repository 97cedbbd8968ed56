//! Application startup and the demo run over the in-memory broker

use crate::app::cli::{Args, Settings};
use crate::app::config::AppConfig;
use crate::app::console::ConsoleEventHandler;
use crate::broker::{MemoryBroker, ShutdownReason};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version;
use crate::dispatch::Dispatcher;
use crate::receiver::{MessageReceiver, ReceiverResult};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;

/// Totals reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub published: usize,
    pub messages: usize,
    pub disconnects: usize,
    pub acknowledged: usize,
}

/// Parse arguments, load configuration, start logging and run
///
/// Returns the process exit code.
pub async fn startup() -> i32 {
    let args = Args::parse();

    let config = match AppConfig::load(args.config_file.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let settings = match args.resolve(config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Err(e) = init_logging(
        Some(&settings.log_level),
        settings.log_format,
        settings.log_file.as_deref(),
        settings.color,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
        return 1;
    }

    log::info!("msgbridge {} starting", version::long_version());
    log::debug!("Settings: {:?}", settings);

    match run(&settings, std::io::stdout()).await {
        Ok(summary) => {
            log::info!(
                "Published {}, surfaced {} messages and {} disconnects, acknowledged {}",
                summary.published,
                summary.messages,
                summary.disconnects,
                summary.acknowledged
            );
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Starting consumer");
            1
        }
    }
}

/// Publish `settings.payloads` through a receiver and drain the event loop
///
/// The queue is named after the identity. After publishing, the connection
/// is closed (hard) or the consumer cancelled (soft, with `settings.soft`),
/// and the event loop runs on the calling task until every producer is gone.
pub async fn run<W: Write>(settings: &Settings, writer: W) -> ReceiverResult<RunSummary> {
    let broker = MemoryBroker::new();
    broker.declare_queue(&settings.identity);
    let connection = Arc::new(broker.connect(&settings.identity));
    let channel = connection.memory_channel();

    let (dispatcher, mut event_loop) = Dispatcher::with_high_water_mark(settings.high_water_mark);
    let receiver = MessageReceiver::new(connection, Arc::new(dispatcher));
    receiver.start_consuming()?;

    let mut published = 0;
    for payload in &settings.payloads {
        match channel.publish(receiver.queue_name(), payload.as_bytes().to_vec()) {
            Ok(_) => published += 1,
            Err(e) => log::warn!("Failed to publish payload: {}", e),
        }
    }

    if settings.soft {
        if let Err(e) = channel.cancel_consumer(receiver.consumer_tag()) {
            log::warn!("Failed to cancel consumer: {}", e);
        }
    } else {
        channel.close_connection(ShutdownReason::ApplicationClosed);
    }
    receiver.stop_consuming();
    drop(receiver);

    let mut handler = ConsoleEventHandler::new(writer, settings.color);
    let executed = event_loop.run(&mut handler).await;
    channel.join_consumers();
    log::debug!("Event loop finished after {} tasks", executed);

    Ok(RunSummary {
        published,
        messages: handler.messages(),
        disconnects: handler.disconnects(),
        acknowledged: channel.acknowledged_tags().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logging::LogFormat;

    fn settings(payloads: &[&str], soft: bool) -> Settings {
        Settings {
            identity: "tester".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
            color: false,
            high_water_mark: 8,
            soft,
            payloads: payloads.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_run_hard_close_surfaces_disconnect() {
        let settings = settings(
            &[
                r#"{"type":"TEXT","content":"hello","sender":"alice"}"#,
                "not json",
                r#"{"type":"NOTICE","content":"bye"}"#,
            ],
            false,
        );
        let mut output = Vec::new();

        let summary = run(&settings, &mut output).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                published: 3,
                messages: 2,
                disconnects: 1,
                acknowledged: 3,
            }
        );
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "alice: hello\n* bye\ndisconnected: connection closed by application\n"
        );
    }

    #[tokio::test]
    async fn test_run_soft_cancel_has_no_disconnect() {
        let settings = settings(&[r#"{"type":"TEXT","content":"x"}"#], true);
        let mut output = Vec::new();

        let summary = run(&settings, &mut output).await.unwrap();

        assert_eq!(summary.messages, 1);
        assert_eq!(summary.disconnects, 0);
        assert_eq!(String::from_utf8(output).unwrap(), "anonymous: x\n");
    }

    #[tokio::test]
    async fn test_run_without_payloads() {
        let summary = run(&settings(&[], false), std::io::sink()).await.unwrap();
        assert_eq!(summary.published, 0);
        assert_eq!(summary.disconnects, 1);
    }
}
