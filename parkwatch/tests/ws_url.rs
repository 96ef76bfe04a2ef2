//! Feed URL construction: scheme rewrite and token query handling.

use parkwatch::feed::ws_url;

#[test]
fn rewrites_http_to_ws() {
    let url = ws_url("http://localhost:8000", "/ws/predictions", None).unwrap();
    assert_eq!(url, "ws://localhost:8000/ws/predictions");
}

#[test]
fn rewrites_https_to_wss() {
    let url = ws_url("https://lot.example.com", "/api/v1/ws/barrier-status", None).unwrap();
    assert_eq!(url, "wss://lot.example.com/api/v1/ws/barrier-status");
}

#[test]
fn keeps_ws_schemes_as_is() {
    let url = ws_url("ws://10.0.0.5:9000", "/ws/predictions", None).unwrap();
    assert_eq!(url, "ws://10.0.0.5:9000/ws/predictions");
}

#[test]
fn appends_token_as_query_param() {
    let url = ws_url(
        "http://localhost:8000",
        "/api/v1/ws/barrier-status",
        Some("secret"),
    )
    .unwrap();
    assert_eq!(
        url,
        "ws://localhost:8000/api/v1/ws/barrier-status?token=secret"
    );
}

#[test]
fn respects_existing_query_with_ampersand() {
    let url = ws_url(
        "http://localhost:8000/?env=prod",
        "/api/v1/ws/barrier-status",
        Some("secret"),
    )
    .unwrap();
    assert_eq!(
        url,
        "ws://localhost:8000/api/v1/ws/barrier-status?env=prod&token=secret"
    );
}

#[test]
fn percent_encodes_token() {
    let url = ws_url(
        "http://localhost:8000",
        "/api/v1/ws/barrier-status",
        Some("a/b=c"),
    )
    .unwrap();
    assert!(
        url.contains("token=a%2Fb%3Dc"),
        "token not encoded in {url}"
    );
}

#[test]
fn joins_base_path_without_doubling_slashes() {
    let url = ws_url("http://gateway:8000/backend/", "/ws/predictions", None).unwrap();
    assert_eq!(url, "ws://gateway:8000/backend/ws/predictions");
}

#[test]
fn rejects_unsupported_schemes_and_garbage() {
    assert!(ws_url("ftp://host", "/ws/predictions", None).is_err());
    assert!(ws_url("not a url", "/ws/predictions", None).is_err());
}
