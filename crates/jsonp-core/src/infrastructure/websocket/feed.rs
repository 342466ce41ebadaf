//! Seismic push-feed client
//!
//! Connects to a WebSocket gateway, pings it on a fixed period and turns
//! every non-empty message into a [`FeedEvent`] on an mpsc channel.

use chrono::{DateTime, Utc};
use futures::{Sink, SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};
use tracing::{debug, info};

use crate::{Result, config::FeedConfig};

/// How a raw message was decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// Message parsed as JSON
    Json,
    /// Anything else, kept as a string
    Text,
}

/// A message received from the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMessage {
    /// Parsed JSON, or the raw text as a JSON string
    pub data: JsonValue,
    /// How `data` was obtained
    pub format: MessageFormat,
}

impl RawMessage {
    /// Decode text, falling back to the raw string when it is not JSON.
    /// Empty text yields `None`.
    pub fn from_text(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        Some(match serde_json::from_str(text) {
            Ok(data) => Self {
                data,
                format: MessageFormat::Json,
            },
            Err(_) => Self {
                data: JsonValue::String(text.to_string()),
                format: MessageFormat::Text,
            },
        })
    }

    /// Decode bytes the same way, reading non-JSON as lossy UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        Some(match serde_json::from_slice(bytes) {
            Ok(data) => Self {
                data,
                format: MessageFormat::Json,
            },
            Err(_) => Self {
                data: JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
                format: MessageFormat::Text,
            },
        })
    }
}

/// Emitted after each client ping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PingEvent {
    /// When the ping was sent
    pub time: DateTime<Utc>,
}

/// Feed event delivered to the consumer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    #[serde(rename = "WebsocketRaw")]
    Raw(RawMessage),
    #[serde(rename = "WebsocketPing")]
    Ping(PingEvent),
}

/// Seismic standing-order feed client
#[derive(Debug, Clone)]
pub struct SeismicFeed {
    config: FeedConfig,
}

impl SeismicFeed {
    /// Feed that connects with `config` once run
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Settings the feed runs with
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Run the feed on a spawned task
    ///
    /// The receiver closes once the task ends; the handle carries its result.
    pub fn subscribe(self) -> (mpsc::Receiver<FeedEvent>, JoinHandle<Result<()>>) {
        let (events_tx, events_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let handle = tokio::spawn(async move { self.run(events_tx).await });
        (events_rx, handle)
    }

    /// Connect and forward events until the gateway closes the socket or
    /// the consumer drops its receiver
    ///
    /// The first ping goes out as soon as the connection is up.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::WebSocket`] if connecting, reading or pinging
    /// fails.
    pub async fn run(&self, events: mpsc::Sender<FeedEvent>) -> Result<()> {
        info!(gateway = %self.config.gateway, "connecting to seismic feed");
        let (socket, _) = connect_async(self.config.gateway.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let period = self.config.ping_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut pending = Some(ping(&mut sink).await?);

        loop {
            let event = match pending.take() {
                Some(event) => event,
                None => tokio::select! {
                    biased;

                    _ = ticker.tick() => ping(&mut sink).await?,
                    message = stream.next() => match message {
                        None | Some(Ok(Message::Close(_))) => {
                            info!("seismic feed closed by gateway");
                            return Ok(());
                        }
                        Some(Err(e)) => return Err(e.into()),
                        Some(Ok(message)) => match decode_message(message) {
                            Some(event) => event,
                            None => continue,
                        },
                    },
                },
            };

            if events.send(event).await.is_err() {
                debug!("feed consumer went away, closing");
                // Best effort: the consumer is gone either way
                let _ = sink.send(Message::Close(None)).await;
                return Ok(());
            }
        }
    }
}

/// Send a keep-alive ping and describe it as an event
async fn ping<S>(sink: &mut S) -> Result<FeedEvent>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    sink.send(Message::Ping(Default::default())).await?;
    debug!("pinged seismic feed");
    Ok(FeedEvent::Ping(PingEvent { time: Utc::now() }))
}

/// Turn a data frame into an event; control frames and empty payloads
/// yield `None`
pub fn decode_message(message: Message) -> Option<FeedEvent> {
    match message {
        Message::Text(text) => RawMessage::from_text(text.as_str()).map(FeedEvent::Raw),
        Message::Binary(bytes) => RawMessage::from_bytes(&bytes).map(FeedEvent::Raw),
        _ => None,
    }
}
