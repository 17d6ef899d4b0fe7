//! Tests for the HTTP response representation

use rotor::http::response::{Response, ResponseBuilder, canonical_reason};

#[test]
fn test_canonical_reason_phrases() {
    assert_eq!(canonical_reason(200), "OK");
    assert_eq!(canonical_reason(400), "Bad Request");
    assert_eq!(canonical_reason(502), "Bad Gateway");
    assert_eq!(canonical_reason(503), "Service Unavailable");
    assert_eq!(canonical_reason(504), "Gateway Timeout");
    assert_eq!(canonical_reason(418), "");
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(200)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"Hello, World!".to_vec());
    assert_eq!(response.reason_phrase(), "OK");
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(200)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(200).body(body.clone()).build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, &body.len().to_string());
}

#[test]
fn test_response_builder_keeps_explicit_content_length() {
    let response = ResponseBuilder::new(200)
        .header("Content-Length", "99")
        .body(b"short".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Length").unwrap(), "99");
}

#[test]
fn test_response_upstream_reason_preserved() {
    // Whatever reason phrase the backend sent is relayed, even for
    // status codes the balancer does not know
    let response = ResponseBuilder::new(418).reason("I'm a teapot").build();

    assert_eq!(response.status, 418);
    assert_eq!(response.reason_phrase(), "I'm a teapot");
}

#[test]
fn test_response_service_unavailable() {
    let response = Response::service_unavailable();

    assert_eq!(response.status, 503);
    assert_eq!(response.body, b"Service not available".to_vec());
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
}

#[test]
fn test_response_bad_gateway() {
    let response = Response::bad_gateway();

    assert_eq!(response.status, 502);
    assert!(String::from_utf8_lossy(&response.body).contains("Bad Gateway"));
}

#[test]
fn test_response_gateway_timeout() {
    let response = Response::gateway_timeout();

    assert_eq!(response.status, 504);
    assert!(String::from_utf8_lossy(&response.body).contains("did not respond in time"));
}
