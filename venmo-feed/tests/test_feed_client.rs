use chrono_tz::Tz;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use venmo_core::{Cursor, Cutoff, ExportDriver, ExportRow, StopReason, TimestampParser};
use venmo_feed::{FeedClient, FeedConfig, FetchError};

/// Minimal HTTP/1.1 server: answers one connection per canned response and
/// returns the request heads it saw.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/stories", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            seen.push(String::from_utf8_lossy(&head).to_string());

            let reply = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        seen
    });

    (base_url, handle)
}

fn config(base_url: String) -> FeedConfig {
    FeedConfig {
        base_url,
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unauthorized_is_a_status_error() {
    let (base_url, server) = serve(vec![(401, r#"{"error":"login required"}"#)]).await;
    let client = FeedClient::new(&config(base_url), "12345", "session=expired").unwrap();

    let err = client.fetch(&Cursor::first()).await.unwrap_err();
    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("login required"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let seen = server.await.unwrap();
    assert!(seen[0].starts_with("GET /api/stories?feedType=me&externalId=12345 HTTP/1.1"));
    assert!(seen[0].to_lowercase().contains("cookie: session=expired"));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (base_url, server) = serve(vec![(200, "<html>maintenance</html>")]).await;
    let client = FeedClient::new(&config(base_url), "12345", "session=abc").unwrap();

    let err = client.fetch(&Cursor::first()).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_feed_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/stories", listener.local_addr().unwrap());
    drop(listener);

    let client = FeedClient::new(&config(base_url), "12345", "session=abc").unwrap();
    let err = client.fetch(&Cursor::first()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_driver_forwards_cursor_between_pages() {
    let (base_url, server) = serve(vec![
        (
            200,
            r#"{"nextId": "page-2", "stories": [
                {"id": "1", "amount": "+ $20.00", "date": "2024-10-04T13:28:52", "type": "payment",
                 "note": {"content": "pizza"},
                 "title": {"sender": {"displayName": "Sam"}, "receiver": {"displayName": "you"}}}
            ]}"#,
        ),
        (
            200,
            r#"{"nextId": "page-3", "stories": [
                {"id": "2", "amount": "$100.00", "date": "2024-10-02T09:00:00Z", "type": "transfer",
                 "note": {"name": "Checking"}},
                {"id": "3", "amount": "- $5.00", "date": "2024-09-28T09:00:00", "type": "payment"}
            ]}"#,
        ),
    ])
    .await;
    let mut client = FeedClient::new(&config(base_url), "12345", "session=abc").unwrap();
    let driver = ExportDriver::new(
        TimestampParser::new(Tz::UTC),
        Cutoff::parse("2024-10-01", Tz::UTC).unwrap(),
    );
    let mut rows: Vec<ExportRow> = Vec::new();

    let summary = driver.run(&mut client, &mut rows).await.unwrap();

    assert_eq!(summary.stop, StopReason::CutoffReached);
    assert_eq!(summary.pages, 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].note, "From Sam | pizza");
    assert_eq!(rows[1].note, "Transfer Checking | $100.00");

    let seen = server.await.unwrap();
    assert!(!seen[0].contains("nextId"));
    assert!(seen[1].starts_with("GET /api/stories?feedType=me&externalId=12345&nextId=page-2 "));
}
