//! Streaming transfer
//!
//! Moves bytes from an upstream source (object-store read or HTTP fetch) to
//! the client without buffering the whole payload. Headers are set on the
//! response before the body streams; once the first chunk is out the status
//! line is committed, so a mid-stream failure can only be logged and the
//! connection terminated.

use axum::body::Body;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks whether any body bytes have been handed to the client.
#[derive(Clone, Default)]
pub struct TransferProgress {
    started: Arc<AtomicBool>,
}

impl TransferProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once at least one chunk has been yielded downstream.
    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    fn mark_started(&self) {
        self.started.store(true, Ordering::Relaxed);
    }
}

/// Wrap an upstream byte stream into a response body.
///
/// Mid-stream errors are logged with the key and byte count, then end the
/// body; the runtime drops the connection without further writes. Partial
/// content under failure is expected.
pub fn relay_body<S, E>(stream: S, key: String) -> (Body, TransferProgress)
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let progress = TransferProgress::new();
    let tracker = progress.clone();
    let mut bytes_sent: u64 = 0;

    let body_stream = stream.map(move |item| match item {
        Ok(chunk) => {
            tracker.mark_started();
            bytes_sent += chunk.len() as u64;
            Ok(chunk)
        }
        Err(e) => {
            tracing::error!(
                key = %key,
                bytes_sent = bytes_sent,
                headers_committed = tracker.has_started(),
                error = %e,
                "Streaming transfer failed, terminating response"
            );
            Err(std::io::Error::other(format!("upstream read failed: {}", e)))
        }
    });

    (Body::from_stream(body_stream), progress)
}
