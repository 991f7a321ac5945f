use dsview::core::{DatasetId, ServiceReply};
use dsview::services::{ClientError, DatasetService, HttpDatasetClient};
use pretty_assertions::assert_eq;
use std::io::Write;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the fake service saw
struct CapturedRequest {
    request_line: String,
    headers: String,
    body: Vec<u8>,
}

fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

/// Accept one request, capture it, and answer with `status` and `body`
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (
    String,
    oneshot::Receiver<CapturedRequest>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = format!("http://{addr}");

    let (tx, rx) = oneshot::channel::<CapturedRequest>();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::with_capacity(4096);
        let header_end = loop {
            let mut tmp = [0_u8; 1024];
            let n = socket.read(&mut tmp).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&tmp[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let (request_line, headers) = head.split_once("\r\n").unwrap();
        let content_length = header_value(headers, "content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut req_body = buf[header_end..].to_vec();
        while req_body.len() < content_length {
            let mut tmp = [0_u8; 4096];
            let n = socket.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            req_body.extend_from_slice(&tmp[..n]);
        }

        let _ = tx.send(CapturedRequest {
            request_line: request_line.to_string(),
            headers: headers.to_string(),
            body: req_body,
        });

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
    });

    (endpoint, rx, handle)
}

#[tokio::test]
async fn upload_posts_multipart_file_field() {
    let (endpoint, rx, handle) = serve_once(
        "200 OK",
        r#"{"dataset_id": "1", "schema": [{"name": "a", "type": "int64"}, {"name": "b", "type": "object"}]}"#,
    )
    .await;

    let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(csv, "a,b\n1,x\n2,y\n").unwrap();

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let reply = client.upload(csv.path()).await.unwrap();

    let ServiceReply::Success(receipt) = reply else {
        panic!("expected a receipt, got {reply:?}");
    };
    assert_eq!(receipt.dataset_id, DatasetId::new("1"));
    assert_eq!(receipt.schema.len(), 2);
    assert_eq!(receipt.schema[1].dtype, "object");

    let request = rx.await.unwrap();
    assert_eq!(request.request_line, "POST /api/upload HTTP/1.1");
    let content_type = header_value(&request.headers, "content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\""), "{body}");
    assert!(body.contains("a,b\n1,x\n2,y\n"), "{body}");

    handle.await.unwrap();
}

#[tokio::test]
async fn upload_error_reply_is_reported_not_raised() {
    let (endpoint, rx, handle) =
        serve_once("200 OK", r#"{"error": "CSV parsing failed: bad line"}"#).await;

    let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(csv, "\"unterminated\n").unwrap();

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let reply = client.upload(csv.path()).await.unwrap();
    assert_eq!(
        reply,
        ServiceReply::Failed("CSV parsing failed: bad line".to_string())
    );

    rx.await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn table_rows_keep_key_order() {
    let (endpoint, rx, handle) =
        serve_once("200 OK", r#"[{"b": "x", "a": 1}, {"b": "y", "a": 2}]"#).await;

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let reply = client.fetch_table(&DatasetId::new("7")).await.unwrap();

    let ServiceReply::Success(rows) = reply else {
        panic!("expected rows, got {reply:?}");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["b", "a"]);

    let request = rx.await.unwrap();
    assert_eq!(request.request_line, "GET /api/dataset/7/table HTTP/1.1");
    handle.await.unwrap();
}

#[tokio::test]
async fn stats_path_encodes_column_name() {
    let (endpoint, rx, handle) = serve_once("200 OK", r#"{"count": 3, "mean": 2.0}"#).await;

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let reply = client
        .fetch_stats(&DatasetId::new("1"), "unit price")
        .await
        .unwrap();

    let ServiceReply::Success(stats) = reply else {
        panic!("expected stats, got {reply:?}");
    };
    assert_eq!(stats.get("count"), Some(&serde_json::json!(3)));

    let request = rx.await.unwrap();
    assert_eq!(
        request.request_line,
        "GET /api/dataset/1/column/unit%20price/stats HTTP/1.1"
    );
    handle.await.unwrap();
}

#[tokio::test]
async fn histogram_sends_configured_bins() {
    let (endpoint, rx, handle) =
        serve_once("200 OK", r#"{"counts": [1, 0, 2], "bins": [0.0, 1.0, 2.0, 3.0]}"#).await;

    let client = HttpDatasetClient::builder(&endpoint)
        .histogram_bins(Some(3))
        .build()
        .unwrap();
    let reply = client
        .fetch_histogram(&DatasetId::new("1"), "a")
        .await
        .unwrap();

    let ServiceReply::Success(histogram) = reply else {
        panic!("expected a histogram, got {reply:?}");
    };
    assert_eq!(histogram.counts, vec![1, 0, 2]);
    assert_eq!(histogram.range(), Some((0.0, 3.0)));

    let request = rx.await.unwrap();
    assert_eq!(
        request.request_line,
        "GET /api/dataset/1/column/a/hist?bins=3 HTTP/1.1"
    );
    handle.await.unwrap();
}

#[tokio::test]
async fn histogram_error_reply_on_non_success_status() {
    let (endpoint, rx, handle) = serve_once(
        "400 Bad Request",
        r#"{"error": "Histogram only for numeric columns"}"#,
    )
    .await;

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let reply = client
        .fetch_histogram(&DatasetId::new("1"), "b")
        .await
        .unwrap();
    assert!(!reply.is_success());
    let ServiceReply::Failed(message) = reply else {
        unreachable!();
    };
    assert_eq!(message, "Histogram only for numeric columns");

    let request = rx.await.unwrap();
    assert_eq!(request.request_line, "GET /api/dataset/1/column/b/hist HTTP/1.1");
    handle.await.unwrap();
}

#[tokio::test]
async fn server_error_without_message_is_a_status_error() {
    let (endpoint, rx, handle) = serve_once("500 Internal Server Error", "oops").await;

    let client = HttpDatasetClient::new(&endpoint).unwrap();
    let err = client
        .fetch_table(&DatasetId::new("1"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Status { ref body, .. } if body == "oops"),
        "{err:?}"
    );

    rx.await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpDatasetClient::new(&format!("http://{addr}")).unwrap();
    let err = client
        .fetch_table(&DatasetId::new("1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)), "{err:?}");
}

#[tokio::test]
async fn missing_upload_file_fails_before_any_request() {
    let client = HttpDatasetClient::new("http://127.0.0.1:9").unwrap();
    let err = client
        .upload(std::path::Path::new("/no/such/file.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ReadFile { .. }), "{err:?}");
}
