//! One WebSocket media stream per task

use crate::config::AppConfig;
use crate::media::{FinishedStream, MediaStreamHandler, Reply};
use crate::recorder;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use telefilter::Filter;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, warn};

/// Serve a media stream until the peer stops it or disconnects
///
/// Each connection owns its handler and filter state; only the designed
/// coefficients are shared.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<AppConfig>,
    filter: Arc<Filter>,
) -> Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake with {} failed", peer))?;
    info!(%peer, "Media stream WebSocket connected");

    let (mut write, mut read) = ws_stream.split();
    let mut handler = MediaStreamHandler::new(
        &peer.to_string(),
        Filter::clone(&filter),
        config.sample_rate(),
        config.stream.echo_filtered,
    );

    while let Some(message) = read.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!(%peer, "WebSocket error: {}", e);
                break;
            }
        };

        match message {
            Message::Text(text) => match handler.handle_text(&text) {
                Reply::Nothing => {}
                Reply::Send(json) => {
                    if let Err(e) = write.send(Message::Text(json)).await {
                        warn!(%peer, "Failed to send outbound media: {}", e);
                    }
                }
                Reply::Close => break,
            },
            Message::Close(frame) => {
                info!(
                    %peer,
                    ?frame,
                    stream_sid = ?handler.stream_sid(),
                    chunks = handler.session().chunk_count(),
                    "Peer closed connection"
                );
                break;
            }
            Message::Binary(data) => {
                warn!(%peer, bytes = data.len(), "Received unexpected binary frame");
            }
            _ => {}
        }
    }

    let finished = handler.finish();
    report(&config, &finished).await;

    if let Err(e) = write.close().await {
        debug!(%peer, "Close after stop failed: {}", e);
    }
    info!(%peer, "Media stream WebSocket closed");

    Ok(())
}

/// Persist and summarize a finished stream
async fn report(config: &AppConfig, finished: &FinishedStream) {
    let recording = &finished.recording;
    if recording.raw.is_empty() {
        info!(stream_sid = ?finished.stream_sid, "Stream ended without audio");
        return;
    }

    info!(
        stream_sid = ?finished.stream_sid,
        call_sid = ?finished.call_sid,
        caller = ?finished.caller,
        samples = recording.raw.len(),
        seconds = recording.duration_secs(),
        skipped = finished.skipped_messages,
        "Call finished"
    );

    match recording.band_report(config.stream.report_low_hz, config.stream.report_high_hz) {
        Ok(report) => info!(stream_sid = ?finished.stream_sid, "{}", report),
        Err(e) => warn!("Band report failed: {}", e),
    }

    if !config.recording.enabled {
        return;
    }

    if let Err(e) =
        recorder::save_recording(&config.recording, finished.stream_sid.as_deref(), recording).await
    {
        error!("Error writing WAV files: {:#}", e);
    }
}
