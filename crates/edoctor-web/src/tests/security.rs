use axum::http::StatusCode;
use tower::util::ServiceExt;

use super::harness::{TestHarness, body_text, get_request, header_value};

#[tokio::test]
async fn every_response_carries_security_headers() {
    let harness = TestHarness::offline();
    for path in ["/maternal", "/fetal", "/assets/index.css", "/missing"] {
        let response = harness
            .router
            .clone()
            .oneshot(get_request(path))
            .await
            .expect("response");
        let headers = response.headers();
        assert_eq!(header_value(headers, "x-content-type-options"), Some("nosniff"));
        assert_eq!(header_value(headers, "x-frame-options"), Some("DENY"));
        assert_eq!(header_value(headers, "cache-control"), Some("no-store"));
        assert!(
            header_value(headers, "content-security-policy")
                .is_some_and(|policy| policy.contains("script-src 'none'"))
        );
    }
}

#[tokio::test]
async fn stylesheet_is_served_as_css() {
    let harness = TestHarness::offline();
    let response = harness
        .router
        .clone()
        .oneshot(get_request("/assets/index.css"))
        .await
        .expect("css");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(response.headers(), "content-type"),
        Some("text/css; charset=utf-8")
    );
    assert!(!body_text(response).await.is_empty());
}
