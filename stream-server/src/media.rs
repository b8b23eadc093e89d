//! Media Streams protocol handling
//!
//! Inbound JSON events (`connected`, `start`, `media`, `stop`, `mark`) drive
//! one [`CallSession`]. Transport lives in `connection`; this module only turns
//! text frames into session updates and optional outbound frames.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use telefilter::{CallSession, Filter, Recording};
use tracing::{debug, info, warn};

/// Media encoding the codec understands
const MULAW_ENCODING: &str = "audio/x-mulaw";

/// Inbound message, tagged by `event`
#[derive(Deserialize, Debug)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum InboundMessage {
    Connected {
        #[serde(default)]
        protocol: Option<String>,
        #[serde(default)]
        version: Option<String>,
    },
    Start {
        #[serde(rename = "streamSid", default)]
        stream_sid: Option<String>,
        start: StartPayload,
    },
    Media {
        #[serde(rename = "streamSid", default)]
        stream_sid: Option<String>,
        media: MediaPayload,
    },
    Stop {
        #[serde(rename = "streamSid", default)]
        stream_sid: Option<String>,
    },
    Mark {
        #[serde(rename = "streamSid", default)]
        stream_sid: Option<String>,
        mark: MarkPayload,
    },
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Top-level `streamSid`, if the event carries one
    pub fn stream_sid(&self) -> Option<&str> {
        match self {
            InboundMessage::Start { stream_sid, .. }
            | InboundMessage::Media { stream_sid, .. }
            | InboundMessage::Stop { stream_sid }
            | InboundMessage::Mark { stream_sid, .. } => stream_sid.as_deref(),
            InboundMessage::Connected { .. } | InboundMessage::Unknown => None,
        }
    }
}

/// Payload of the `start` event
#[derive(Deserialize, Debug)]
pub struct StartPayload {
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
    #[serde(rename = "callSid", default)]
    pub call_sid: Option<String>,
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(rename = "mediaFormat", default)]
    pub media_format: Option<MediaFormat>,
    #[serde(rename = "customParameters", default)]
    pub custom_parameters: HashMap<String, String>,
}

#[derive(Deserialize, Debug)]
pub struct MediaFormat {
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(rename = "sampleRate", default)]
    pub sample_rate: Option<u32>,
}

/// Payload of the `media` event; `payload` is base64 µ-law
#[derive(Deserialize, Debug)]
pub struct MediaPayload {
    pub payload: String,
    #[serde(default)]
    pub chunk: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct MarkPayload {
    pub name: String,
}

/// Outbound media message
#[derive(Serialize)]
struct OutboundMedia<'a> {
    event: &'a str,
    #[serde(rename = "streamSid")]
    stream_sid: &'a str,
    media: OutboundPayload,
}

#[derive(Serialize)]
struct OutboundPayload {
    payload: String,
}

/// What the transport should do after a frame
#[derive(Debug, PartialEq)]
pub enum Reply {
    Nothing,
    Send(String),
    Close,
}

/// Everything known about a stream once it has ended
#[derive(Debug)]
pub struct FinishedStream {
    pub stream_sid: Option<String>,
    pub call_sid: Option<String>,
    pub caller: Option<String>,
    pub recording: Recording,
    pub skipped_messages: usize,
}

/// Per-connection protocol state
pub struct MediaStreamHandler {
    session: CallSession,
    sample_rate: u32,
    echo_filtered: bool,

    stream_sid: Option<String>,
    call_sid: Option<String>,
    caller: Option<String>,
    skipped_messages: usize,
}

impl MediaStreamHandler {
    pub fn new(connection_id: &str, filter: Filter, sample_rate: u32, echo_filtered: bool) -> Self {
        Self {
            session: CallSession::new(connection_id, filter, sample_rate),
            sample_rate,
            echo_filtered,
            stream_sid: None,
            call_sid: None,
            caller: None,
            skipped_messages: 0,
        }
    }

    pub fn stream_sid(&self) -> Option<&str> {
        self.stream_sid.as_deref()
    }

    pub fn session(&self) -> &CallSession {
        &self.session
    }

    /// Handle one text frame
    ///
    /// Malformed frames are logged and skipped.
    pub fn handle_text(&mut self, text: &str) -> Reply {
        let message: InboundMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping malformed stream message: {}", e);
                self.skipped_messages += 1;
                return Reply::Nothing;
            }
        };

        if self.stream_sid.is_none() {
            if let Some(sid) = message.stream_sid() {
                info!(stream_sid = sid, "StreamSid set");
                self.stream_sid = Some(sid.to_string());
            }
        }

        match message {
            InboundMessage::Connected { protocol, version } => {
                info!(?protocol, ?version, "Media stream connected");
                Reply::Nothing
            }
            InboundMessage::Start { start, .. } => {
                self.handle_start(start);
                Reply::Nothing
            }
            InboundMessage::Media { media, .. } => self.handle_media(&media),
            InboundMessage::Stop { .. } => {
                info!(
                    stream_sid = ?self.stream_sid,
                    chunks = self.session.chunk_count(),
                    "Media stream stopped"
                );
                Reply::Close
            }
            InboundMessage::Mark { mark, .. } => {
                debug!(name = %mark.name, "Mark acknowledged");
                Reply::Nothing
            }
            InboundMessage::Unknown => {
                debug!("Unhandled event type");
                Reply::Nothing
            }
        }
    }

    fn handle_start(&mut self, start: StartPayload) {
        if let Some(format) = &start.media_format {
            if let Some(encoding) = format.encoding.as_deref() {
                if encoding != MULAW_ENCODING {
                    warn!(encoding, "Unexpected media encoding, decoding as µ-law anyway");
                }
            }
            if let Some(rate) = format.sample_rate {
                if rate != self.sample_rate {
                    warn!(rate, expected = self.sample_rate, "Stream sample rate differs from filter design");
                }
            }
        }

        self.caller = start
            .custom_parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("from"))
            .map(|(_, value)| value.clone());

        info!(
            stream_sid = %start.stream_sid,
            call_sid = ?start.call_sid,
            caller = ?self.caller,
            tracks = ?start.tracks,
            "Media stream started"
        );

        self.stream_sid = Some(start.stream_sid);
        self.call_sid = start.call_sid;
    }

    fn handle_media(&mut self, media: &MediaPayload) -> Reply {
        let bytes = match STANDARD.decode(media.payload.as_bytes()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(chunk = ?media.chunk, "Skipping media with invalid base64: {}", e);
                self.skipped_messages += 1;
                return Reply::Nothing;
            }
        };

        if let Err(e) = self.session.ingest_mulaw(&bytes) {
            warn!("Failed to filter media chunk: {}", e);
            self.skipped_messages += 1;
            return Reply::Nothing;
        }

        if !self.echo_filtered {
            return Reply::Nothing;
        }

        let Some(stream_sid) = self.stream_sid.as_deref() else {
            return Reply::Nothing;
        };

        let message = OutboundMedia {
            event: "media",
            stream_sid,
            media: OutboundPayload {
                payload: STANDARD.encode(self.session.encode_last_chunk()),
            },
        };

        match serde_json::to_string(&message) {
            Ok(json) => Reply::Send(json),
            Err(e) => {
                warn!("Failed to serialize outbound media: {}", e);
                Reply::Nothing
            }
        }
    }

    /// End the stream and release its filter state
    pub fn finish(self) -> FinishedStream {
        FinishedStream {
            stream_sid: self.stream_sid,
            call_sid: self.call_sid,
            caller: self.caller,
            recording: self.session.finish(),
            skipped_messages: self.skipped_messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telefilter::{codec, FilterConfig};

    fn handler(echo: bool) -> MediaStreamHandler {
        let filter = FilterConfig::default().design().unwrap();
        MediaStreamHandler::new("127.0.0.1:5000", filter, 8000, echo)
    }

    fn media_json(bytes: &[u8]) -> String {
        format!(
            r#"{{"event":"media","sequenceNumber":"3","media":{{"track":"inbound","chunk":"2","timestamp":"20","payload":"{}"}},"streamSid":"MZ123"}}"#,
            STANDARD.encode(bytes)
        )
    }

    const START: &str = r#"{
        "event": "start",
        "sequenceNumber": "1",
        "start": {
            "accountSid": "AC1",
            "streamSid": "MZ123",
            "callSid": "CA456",
            "tracks": ["inbound"],
            "mediaFormat": {"encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1},
            "customParameters": {"From": "+15550100"}
        },
        "streamSid": "MZ123"
    }"#;

    #[test]
    fn test_parse_events() {
        let connected: InboundMessage =
            serde_json::from_str(r#"{"event":"connected","protocol":"Call","version":"1.0.0"}"#).unwrap();
        assert!(matches!(connected, InboundMessage::Connected { .. }));
        assert_eq!(connected.stream_sid(), None);

        let start: InboundMessage = serde_json::from_str(START).unwrap();
        match start {
            InboundMessage::Start { start, .. } => {
                assert_eq!(start.stream_sid, "MZ123");
                assert_eq!(start.call_sid.as_deref(), Some("CA456"));
                assert_eq!(start.media_format.and_then(|f| f.sample_rate), Some(8000));
            }
            other => panic!("unexpected message {:?}", other),
        }

        // track, timestamp and sequenceNumber are not modelled
        let media: InboundMessage = serde_json::from_str(&media_json(&[0xFF, 0x7F])).unwrap();
        match media {
            InboundMessage::Media { media, .. } => {
                assert_eq!(media.chunk.as_deref(), Some("2"));
                assert_eq!(STANDARD.decode(media.payload).unwrap(), vec![0xFF, 0x7F]);
            }
            other => panic!("unexpected message {:?}", other),
        }

        let stop: InboundMessage = serde_json::from_str(r#"{"event":"stop","streamSid":"MZ9"}"#).unwrap();
        assert_eq!(stop.stream_sid(), Some("MZ9"));

        let dtmf: InboundMessage = serde_json::from_str(r#"{"event":"dtmf","dtmf":{"digit":"1"}}"#).unwrap();
        assert!(matches!(dtmf, InboundMessage::Unknown));
    }

    #[test]
    fn test_full_stream() {
        let mut handler = handler(false);

        assert_eq!(handler.handle_text(r#"{"event":"connected"}"#), Reply::Nothing);
        assert_eq!(handler.handle_text(START), Reply::Nothing);
        assert_eq!(handler.stream_sid(), Some("MZ123"));

        for _ in 0..3 {
            assert_eq!(handler.handle_text(&media_json(&[0xFF; 160])), Reply::Nothing);
        }
        assert_eq!(
            handler.handle_text(r#"{"event":"mark","streamSid":"MZ123","mark":{"name":"m1"}}"#),
            Reply::Nothing
        );
        assert_eq!(handler.handle_text(r#"{"event":"stop","streamSid":"MZ123"}"#), Reply::Close);

        let finished = handler.finish();
        assert_eq!(finished.stream_sid.as_deref(), Some("MZ123"));
        assert_eq!(finished.call_sid.as_deref(), Some("CA456"));
        assert_eq!(finished.caller.as_deref(), Some("+15550100"));
        assert_eq!(finished.recording.raw.len(), 480);
        assert_eq!(finished.recording.filtered.len(), 480);
        assert_eq!(finished.skipped_messages, 0);
    }

    #[test]
    fn test_stream_sid_from_media_without_start() {
        let mut handler = handler(false);
        handler.handle_text(&media_json(&[0x80, 0x00]));
        assert_eq!(handler.stream_sid(), Some("MZ123"));
        assert_eq!(handler.session().sample_count(), 2);
    }

    #[test]
    fn test_malformed_messages_are_skipped() {
        let mut handler = handler(false);

        assert_eq!(handler.handle_text("not json"), Reply::Nothing);
        assert_eq!(
            handler.handle_text(r#"{"event":"media","media":{"payload":"not-valid-base64!!!"}}"#),
            Reply::Nothing
        );
        assert_eq!(handler.session().chunk_count(), 0);
        assert_eq!(handler.finish().skipped_messages, 2);
    }

    #[test]
    fn test_echo_sends_filtered_chunk() {
        let mut handler = handler(true);
        handler.handle_text(START);

        let input = codec::encode_buffer(&[0, 4000, -4000, 12000, -12000]);
        let reply = handler.handle_text(&media_json(&input));

        let json = match reply {
            Reply::Send(json) => json,
            other => panic!("expected outbound media, got {:?}", other),
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "media");
        assert_eq!(value["streamSid"], "MZ123");

        let payload = value["media"]["payload"].as_str().unwrap();
        let echoed = STANDARD.decode(payload).unwrap();
        assert_eq!(echoed, handler.session().encode_last_chunk());
        assert_eq!(echoed.len(), input.len());
    }
}
