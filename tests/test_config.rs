//! Tests for configuration loading and validation

use rotor::config::Config;

const VALID_CONFIG: &str = r#"
server:
  listen_addr: "127.0.0.1:8000"
backends:
  - url: "http://localhost:8001"
    name: app-1
  - url: "http://localhost:8002"
"#;

#[test]
fn test_config_valid_yaml() {
    let cfg = Config::from_yaml(VALID_CONFIG).unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8000");
    assert_eq!(cfg.backends.len(), 2);
    assert_eq!(cfg.backends[0].url, "http://localhost:8001");
    assert_eq!(cfg.backends[0].name.as_deref(), Some("app-1"));
    assert_eq!(cfg.backends[1].url, "http://localhost:8002");
    assert!(cfg.backends[1].name.is_none());
}

#[test]
fn test_config_backend_order_preserved() {
    let cfg = Config::from_yaml(VALID_CONFIG).unwrap();

    let urls: Vec<&str> = cfg.backends.iter().map(|b| b.url.as_str()).collect();
    assert_eq!(urls, vec!["http://localhost:8001", "http://localhost:8002"]);
}

#[test]
fn test_config_default_timeouts() {
    let cfg = Config::from_yaml(VALID_CONFIG).unwrap();

    assert_eq!(cfg.proxy.connect_timeout_secs, 5);
    assert_eq!(cfg.proxy.request_timeout_secs, 30);
}

#[test]
fn test_config_custom_timeouts() {
    let raw = r#"
server:
  listen_addr: "127.0.0.1:8000"
backends: []
proxy:
  connect_timeout_secs: 2
  request_timeout_secs: 10
"#;

    let cfg = Config::from_yaml(raw).unwrap();
    assert_eq!(cfg.proxy.connect_timeout_secs, 2);
    assert_eq!(cfg.proxy.request_timeout_secs, 10);
}

#[test]
fn test_config_malformed_backend_url_aborts_load() {
    // The first malformed URL fails the whole load, valid entries
    // after it are not registered either
    let raw = r#"
server:
  listen_addr: "127.0.0.1:8000"
backends:
  - url: "not a url"
  - url: "http://localhost:8002"
"#;

    let err = Config::from_yaml(raw).unwrap_err();
    assert!(err.to_string().contains("Malformed backend URL"));
}

#[test]
fn test_config_invalid_yaml() {
    let err = Config::from_yaml("server: [unclosed").unwrap_err();
    assert!(err.to_string().contains("Invalid config file"));
}

#[test]
fn test_config_empty_backend_list_is_allowed() {
    let raw = r#"
server:
  listen_addr: "127.0.0.1:8000"
backends: []
"#;

    let cfg = Config::from_yaml(raw).unwrap();
    assert!(cfg.backends.is_empty());
}
