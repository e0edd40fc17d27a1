use busmap::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// HTTP data source against a one-shot local server
#[cfg(test)]
mod http_source_test {
    use super::*;

    /// Serves a single response and hands back the request line it received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/json/", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let text = String::from_utf8_lossy(&received).to_string();
            text.lines().next().unwrap_or_default().to_string()
        });

        (base_url, server)
    }

    fn direct_source(base_url: String) -> HttpDataSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpDataSource::with_client(client, base_url)
    }

    fn request() -> FetchRequest {
        FetchRequest {
            lat: 51.5,
            lng: 0.7,
            width: 0.1,
            height: 0.05,
            min_freq: 2,
        }
    }

    /// The bounding box goes out as query parameters and the body is parsed
    #[tokio::test]
    async fn test_fetch_sends_box_and_parses_payload() {
        let body = r#"{
            "stops": {"490000001": {"lat": 51.49, "lng": 0.71, "name": "High Street"}},
            "pairs": [{"from": "490000001", "to": "490000002", "frequency": 6, "line_names": ["7", null]}]
        }"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let payload = direct_source(base_url).fetch(&request()).await.unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(
            request_line,
            "GET /json/?lat=51.5&lng=0.7&width=0.1&height=0.05&min_freq=2 HTTP/1.1"
        );
        assert_eq!(payload.stops["490000001"].name, "High Street");
        assert_eq!(payload.pairs.len(), 1);
        assert_eq!(payload.pairs[0].frequency, 6);
        assert_eq!(payload.pairs[0].line_names, vec!["7".to_string()]);
    }

    /// A non-success status is reported with its code
    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (base_url, server) = serve_once("500 Internal Server Error", "{}").await;

        let result = direct_source(base_url).fetch(&request()).await;
        server.await.unwrap();

        match result {
            Err(MapError::HttpStatus { status, url }) => {
                assert_eq!(status, 500);
                assert!(url.contains("min_freq=2"));
            }
            other => panic!("expected HTTP status error, got {:?}", other),
        }
    }

    /// A body that is not the expected JSON is a serialization error
    #[tokio::test]
    async fn test_malformed_body_is_a_serialization_error() {
        let (base_url, server) = serve_once("200 OK", "<html>oops</html>").await;

        let result = direct_source(base_url).fetch(&request()).await;
        server.await.unwrap();

        assert!(matches!(result, Err(MapError::Serialization(_))));
    }
}
