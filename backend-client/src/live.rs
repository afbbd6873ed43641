//! Live alert channel.
//!
//! One WebSocket per subscription; text (or binary) frames are decoded as
//! [`Alert`] records. A dropped connection is logged and not re-opened.

use std::sync::Arc;
use std::sync::Mutex;

use futures::SinkExt;
use futures::StreamExt;
use raksha_protocol::Alert;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::ApiError;
use crate::error::ApiResult;

type AlertSink = Arc<Mutex<Option<Box<dyn FnMut(Alert) + Send>>>>;

/// Handle to an open live alert subscription.
///
/// Closing (or dropping) the handle disarms the callback before returning:
/// once `close` returns no further alert is delivered, even if frames are
/// still in flight. The socket itself is closed by the pump task.
pub struct AlertSubscription {
    url: String,
    cancel: CancellationToken,
    sink: AlertSink,
    task: Option<JoinHandle<()>>,
}

impl AlertSubscription {
    pub(crate) async fn connect<F>(url: &str, on_alert: F) -> ApiResult<Self>
    where
        F: FnMut(Alert) + Send + 'static,
    {
        let (ws, _response) =
            tokio_tungstenite::connect_async(url)
                .await
                .map_err(|e| ApiError::Connect {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        info!("live alert channel open: {url}");

        let cancel = CancellationToken::new();
        let sink: AlertSink = Arc::new(Mutex::new(Some(Box::new(on_alert))));
        let task = tokio::spawn(pump(ws, url.to_string(), cancel.clone(), Arc::clone(&sink)));

        Ok(Self {
            url: url.to_string(),
            cancel,
            sink,
            task: Some(task),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True once the subscription was closed locally or the connection ended.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
            || self
                .task
                .as_ref()
                .is_none_or(tokio::task::JoinHandle::is_finished)
    }

    /// Stop delivery and close the connection.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.task.take().is_none() {
            return;
        }
        self.cancel.cancel();
        // Taking the lock waits for an in-progress delivery to finish.
        match self.sink.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        debug!("live alert channel closed: {}", self.url);
    }
}

impl Drop for AlertSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for AlertSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertSubscription")
            .field("url", &self.url)
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn pump<S>(mut ws: S, url: String, cancel: CancellationToken, sink: AlertSink)
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Err(e) = ws.close().await {
                    debug!("live alert channel close handshake failed: {e}");
                }
                return;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => deliver(&sink, text.as_bytes()),
                Some(Ok(Message::Binary(bytes))) => deliver(&sink, &bytes),
                Some(Ok(Message::Close(_))) | None => {
                    info!("live alert channel closed by server: {url}");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("live alert channel dropped: {url}: {e}");
                    break;
                }
            }
        }
    }
    cancel.cancel();
}

fn deliver(sink: &AlertSink, payload: &[u8]) {
    let alert = match serde_json::from_slice::<Alert>(payload) {
        Ok(alert) => alert,
        Err(e) => {
            warn!("skipping undecodable live alert: {e}");
            return;
        }
    };
    let Ok(mut guard) = sink.lock() else {
        return;
    };
    if let Some(on_alert) = guard.as_mut() {
        on_alert(alert);
    }
}
