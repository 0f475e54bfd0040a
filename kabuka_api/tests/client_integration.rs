use kabuka_api::{Client, Error};
use wiremock::matchers::{header, header_exists, headers, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body><span class="kabuka">2,345円</span></body></html>"#;

#[tokio::test]
async fn fetch_quote_page_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .and(query_param("code", "7203"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(PAGE),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.fetch_quote_page("7203").await;
    assert!(result.is_ok());
    assert!(result.unwrap().contains("class=\"kabuka\""));
}

#[tokio::test]
async fn fetch_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .and(header_exists("user-agent"))
        .and(headers("accept-language", vec!["ja", "en-US;q=0.7", "en;q=0.3"]))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .and(header("upgrade-insecure-requests", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    assert!(client.fetch_quote_page("6758").await.is_ok());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let header_value = |name: &str| -> String {
        requests[0]
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_else(|| panic!("missing header {}", name))
            .to_string()
    };

    let accept = header_value("accept");
    assert!(accept.starts_with("text/html"), "accept was {:?}", accept);
    assert!(accept.contains("application/xhtml+xml"));

    assert_eq!(header_value("accept-language"), "ja,en-US;q=0.7,en;q=0.3");

    let encodings: Vec<String> = header_value("accept-encoding")
        .split(',')
        .map(|e| e.trim().to_string())
        .collect();
    for expected in ["gzip", "deflate", "br"] {
        assert!(
            encodings.iter().any(|e| e == expected),
            "accept-encoding {:?} lacks {}",
            encodings,
            expected
        );
    }
}

#[tokio::test]
async fn fetch_encodes_index_alias() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .and(query_param("code", "^N225"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    assert!(client.fetch_quote_page("^N225").await.is_ok());
}

#[tokio::test]
async fn fetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.fetch_quote_page("7203").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    match err {
        Error::HttpStatus { body, .. } => assert_eq!(body, "Internal Server Error"),
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_non_200_success_status_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.fetch_quote_page("7203").await.unwrap_err();
    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn fetch_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.fetch_quote_page("7203").await.unwrap_err();
    assert!(matches!(err, Error::EmptyBody { status: 200 }));
}

#[tokio::test]
async fn fetch_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock/kabuka"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/stock/moved?code=7203"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stock/moved"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    assert!(client.fetch_quote_page("7203").await.is_ok());
}

#[tokio::test]
async fn fetch_connection_refused_is_transport_error() {
    // Port 9 (discard) is closed on test hosts.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client.fetch_quote_page("7203").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.status(), None);
}
