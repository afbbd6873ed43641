#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use futures::SinkExt;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use raksha_backend_client::ApiError;
use raksha_backend_client::GatewayClient;
use raksha_protocol::Alert;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

/// Accepts one WebSocket client on `/ws`, sends `frames`, then waits for the
/// client to go away. Returns the base address and a receiver that fires when
/// the server observes the client closing.
async fn serve_frames(frames: Vec<String>) -> (String, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            ws.send(Message::Text(frame)).await.unwrap();
        }
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
        let _ = closed_tx.send(());
    });

    (format!("http://{addr}"), closed_rx)
}

fn alert_frame(message: &str) -> String {
    serde_json::json!({
        "message": message,
        "vehicle_id": "Bus #17",
        "location": "Metro Station XYZ",
    })
    .to_string()
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<Alert>) -> Alert {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("alert should arrive")
        .expect("channel open")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn alerts_are_delivered_in_arrival_order() {
    let (base, _closed) = serve_frames(vec![
        alert_frame("M1"),
        "{not json".to_string(),
        alert_frame("M2"),
        alert_frame("M3"),
    ])
    .await;
    let client = GatewayClient::new(&base).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let subscription = client
        .subscribe_alerts(move |alert| {
            let _ = tx.send(alert);
        })
        .await
        .unwrap();

    let received = vec![
        recv(&mut rx).await.message,
        recv(&mut rx).await.message,
        recv(&mut rx).await.message,
    ];
    assert_eq!(received, vec!["M1", "M2", "M3"]);
    subscription.close();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn close_stops_delivery_and_closes_the_socket() {
    let (base, closed) = serve_frames(Vec::new()).await;
    let client = GatewayClient::new(&base).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<Alert>();

    let subscription = client
        .subscribe_alerts(move |alert| {
            let _ = tx.send(alert);
        })
        .await
        .unwrap();
    subscription.close();

    tokio::time::timeout(Duration::from_secs(5), closed)
        .await
        .expect("server should observe the close")
        .unwrap();
    // The callback (and its sender) was dropped on close.
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GatewayClient::new(&format!("http://{addr}")).unwrap();
    let err = client.subscribe_alerts(|_| {}).await.unwrap_err();
    assert!(matches!(err, ApiError::Connect { .. }), "got {err:?}");
}
