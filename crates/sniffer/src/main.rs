//! Photon Sniffer - offline decoder for captured game traffic
//!
//! Reads captured UDP payloads from a dump file, decodes each one and hands
//! the decoded packets to the message dispatcher over a bounded channel.

mod dispatch;
mod dump;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use photon_config::{SnifferConfig, DEFAULT_CONFIG_PATH};
use photon_core::MessageKind;
use photon_protocol::{Message, Packet, PacketDecoder};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dispatch::MessageDispatcher;

#[derive(Parser, Debug)]
#[command(version, about = "Decode captured Photon traffic")]
struct Args {
    /// Options file [default: config/sniffer.txt]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump file to read instead of the configured one
    dump: Option<PathBuf>,

    /// Bound command bodies by their declared length
    #[arg(long)]
    strict: bool,
}

/// Counters reported once the dump is exhausted
#[derive(Debug, Default)]
struct Summary {
    decoded: usize,
    failed: usize,
    filtered: usize,
    malformed_lines: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = match &args.config {
        Some(path) => SnifferConfig::load_from_file(path),
        None => SnifferConfig::load_default(),
    }
    .map_err(|e| e.to_string());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => SnifferConfig::default(),
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match loaded {
        Ok(_) => info!("Loaded configuration from {}", config_path.display()),
        Err(e) => {
            warn!("Failed to load {}: {}", config_path.display(), e);
            warn!("Using default configuration (port {})", config.port);
        }
    }

    if let Some(dump) = args.dump {
        config.dump_file = dump;
    }
    if args.strict {
        config.strict_length = true;
    }
    config.display();

    let (tx, mut rx) = mpsc::channel::<Packet>(config.channel_capacity);

    let dispatcher = build_dispatcher(&config);
    let consumer = tokio::spawn(async move {
        let mut delivered = 0;
        while let Some(packet) = rx.recv().await {
            delivered += dispatcher.dispatch(&packet);
        }
        delivered
    });

    let summary = match read_dump(&config, tx).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Reading {} failed: {:#}", config.dump_file.display(), e);
            return Err(e);
        }
    };
    let delivered = consumer.await.context("dispatcher task panicked")?;

    info!(
        "Done: {} decoded, {} failed, {} filtered, {} malformed lines, {} messages delivered",
        summary.decoded, summary.failed, summary.filtered, summary.malformed_lines, delivered
    );
    Ok(())
}

/// Decode every datagram of the dump and queue the packets for dispatch
async fn read_dump(config: &SnifferConfig, tx: mpsc::Sender<Packet>) -> anyhow::Result<Summary> {
    let file = tokio::fs::File::open(&config.dump_file)
        .await
        .with_context(|| format!("opening {}", config.dump_file.display()))?;
    let mut lines = BufReader::new(file).lines();

    let decoder = PacketDecoder::with_options(config.decode_options());
    let mut summary = Summary::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;

        let record = match dump::parse_line(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                warn!("Line {}: {}", line_no, e);
                summary.malformed_lines += 1;
                continue;
            }
        };

        if !record.matches_port(config.port) {
            summary.filtered += 1;
            continue;
        }

        match decoder.decode(&record.payload) {
            Ok(packet) => {
                summary.decoded += 1;
                if tx.send(packet).await.is_err() {
                    anyhow::bail!("dispatcher stopped early");
                }
            }
            Err(e) => {
                warn!("Line {}: dropping {}-byte packet: {}", line_no, record.payload.len(), e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Print the enabled message kinds as JSON lines on stdout
fn build_dispatcher(config: &SnifferConfig) -> MessageDispatcher {
    let mut dispatcher = MessageDispatcher::new();

    let enabled = [
        (MessageKind::Request, config.log_requests),
        (MessageKind::Response, config.log_responses),
        (MessageKind::Event, config.log_events),
    ];
    for (kind, on) in enabled {
        if on {
            dispatcher.register(kind, print_message);
        }
    }

    dispatcher.register(MessageKind::Event, |message| {
        if let Message::Event(event) = message {
            if let Some(pos) = event.position() {
                tracing::debug!("Position update: ({:.2}, {:.2})", pos.x, pos.y);
            }
        }
        Ok(())
    });

    dispatcher
}

fn print_message(message: &Message) -> anyhow::Result<()> {
    let json = serde_json::to_string(message)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_optional() {
        let args = Args::try_parse_from(["photon-sniffer"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.dump, None);
        assert!(!args.strict);

        let args =
            Args::try_parse_from(["photon-sniffer", "-c", "alt.txt", "--strict", "dump.txt"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("alt.txt")));
        assert_eq!(args.dump, Some(PathBuf::from("dump.txt")));
        assert!(args.strict);
    }

    #[test]
    fn test_dispatcher_follows_print_switches() {
        let config = SnifferConfig {
            log_requests: false,
            log_responses: false,
            ..SnifferConfig::default()
        };
        let dispatcher = build_dispatcher(&config);
        assert!(!dispatcher.has_handler(MessageKind::Request));
        assert!(!dispatcher.has_handler(MessageKind::Response));
        // Printer plus position logger
        assert_eq!(dispatcher.handler_count(), 2);
    }
}
