use crate::{config::CrawlConfig, error::ErrorClass, source::Credentials};

#[test]
fn full_config_maps_to_connection_and_options() {
    let config = CrawlConfig::from_json(
        r#"{
            "name": "customers",
            "url": "db-1:9042",
            "user": "crawler",
            "password": "secret",
            "keySpace": "shop",
            "bufferSize": 250,
            "maxDepth": 4,
            "query": { "cql": "SELECT id FROM customers" }
        }"#,
    )
    .expect("config is valid");

    let conn = config.connection();
    assert_eq!(conn.endpoint, "db-1:9042");
    assert_eq!(conn.keyspace.as_deref(), Some("shop"));
    assert_eq!(conn.credentials, Some(Credentials::new("crawler", "secret")));

    let options = config.options().expect("options are valid");
    assert_eq!(options.fetch_size.get(), 250);
    assert_eq!(options.max_depth, Some(4));

    let query = config.query.expect("query is configured");
    assert_eq!(query.query(), Some("SELECT id FROM customers"));
}

#[test]
fn defaults_apply_when_fields_are_absent() {
    let config = CrawlConfig::from_json(r#"{"endpoint": "localhost:9042", "keyspace": "  "}"#)
        .expect("config is valid");

    let conn = config.connection();
    assert_eq!(conn.keyspace, None);
    assert_eq!(conn.credentials, None);

    let options = config.options().expect("options are valid");
    assert_eq!(options.fetch_size.get(), 100);
    assert_eq!(options.max_depth, None);
    assert!(config.query.is_none());
}

#[test]
fn embedded_query_string_is_parsed_as_a_tree() {
    let config = CrawlConfig::from_json(
        r#"{
            "endpoint": "localhost:9042",
            "cqlQuery": "{\"cql\": \"SELECT id FROM customers\", \"join\": {\"id\": [{\"cql\": \"SELECT * FROM orders WHERE customer_id = ?\"}]}}"
        }"#,
    )
    .expect("config is valid");

    let tree = config.query.expect("query is configured");
    assert_eq!(tree.children("id").len(), 1);
}

#[test]
fn blank_embedded_query_means_none() {
    let config = CrawlConfig::from_json(r#"{"endpoint": "localhost:9042", "cqlQuery": " "}"#)
        .expect("config is valid");

    assert!(config.query.is_none());
}

#[test]
fn missing_endpoint_is_rejected() {
    let err = CrawlConfig::from_json(r#"{"bufferSize": 10}"#).expect_err("endpoint required");

    assert_eq!(err.class, ErrorClass::Config);
    assert_eq!(err.message, "the host:port is missing");
}

#[test]
fn zero_buffer_size_is_rejected() {
    let err = CrawlConfig::from_json(r#"{"endpoint": "localhost:9042", "bufferSize": 0}"#)
        .expect_err("buffer must be positive");

    assert_eq!(err.class, ErrorClass::Config);
}

#[test]
fn credentials_debug_redacts_password() {
    let rendered = format!("{:?}", Credentials::new("crawler", "secret"));

    assert!(rendered.contains("crawler"));
    assert!(!rendered.contains("secret"));
}
