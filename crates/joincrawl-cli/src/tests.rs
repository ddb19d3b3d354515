use crate::{Cli, limit_verdict, write_crawl};
use clap::Parser;
use joincrawl_core::{
    config::CrawlConfig,
    crawl::{CrawlStats, RowControl},
    source::memory::MemoryFixture,
};

const CONFIG: &str = include_str!("../../../demos/customers.config.json");
const FIXTURE: &str = include_str!("../../../demos/customers.fixture.json");

// Crawl the demo tree and return the printed lines.
fn crawl_demo(limit: Option<u64>) -> (Vec<String>, CrawlStats) {
    let config = CrawlConfig::from_json(CONFIG).expect("demo config is valid");
    let source = MemoryFixture::from_json(FIXTURE)
        .expect("demo fixture parses")
        .into_source()
        .expect("demo fixture is consistent");
    let root = config.query.as_ref().expect("demo config has a query");
    let options = config.options().expect("demo options are valid");

    let mut out = Vec::new();
    let stats = write_crawl(
        &source,
        &config.connection(),
        root,
        options,
        limit,
        &mut out,
    )
    .expect("demo crawl succeeds");

    let text = String::from_utf8(out).expect("output is utf-8");
    (text.lines().map(str::to_string).collect(), stats)
}

#[test]
fn limit_verdict_stops_at_the_limit() {
    assert_eq!(limit_verdict(1, None), RowControl::Continue);
    assert_eq!(limit_verdict(1, Some(2)), RowControl::Continue);
    assert_eq!(limit_verdict(2, Some(2)), RowControl::Stop);
    assert_eq!(limit_verdict(7, Some(2)), RowControl::Stop);
}

#[test]
fn unlimited_crawl_prints_every_row() {
    let (lines, stats) = crawl_demo(None);

    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], r#"{"id":1,"region":"eu"}"#);
    assert_eq!(lines[12], r#"{"code":"us","name":"United States"}"#);
    assert_eq!(stats.queries, 10);
    assert_eq!(stats.rows, 13);
    assert_eq!(stats.early_stops, 0);
}

#[test]
fn limit_of_one_still_fans_out_the_stopping_row() {
    let (lines, stats) = crawl_demo(Some(1));

    // The first customer stops the root, but its joins still run, and each
    // of them stops after its own first row.
    assert_eq!(
        lines,
        [
            r#"{"id":1,"region":"eu"}"#,
            r#"{"order_id":100,"customer_id":1}"#,
            r#"{"sku":"A-1","order_id":100}"#,
            r#"{"code":"eu","name":"Europe"}"#,
        ]
    );
    assert_eq!(stats.early_stops, 4);
    assert_eq!(stats.deepest, 2);
}

#[test]
fn limit_reached_in_a_child_lets_the_parent_row_in_flight_finish() {
    let (lines, stats) = crawl_demo(Some(2));

    // Row 2 is the first order; the root row already in flight continues to
    // its second customer, which then stops the root.
    assert_eq!(
        lines,
        [
            r#"{"id":1,"region":"eu"}"#,
            r#"{"order_id":100,"customer_id":1}"#,
            r#"{"sku":"A-1","order_id":100}"#,
            r#"{"code":"eu","name":"Europe"}"#,
            r#"{"id":2,"region":"us"}"#,
            r#"{"order_id":200,"customer_id":2}"#,
            r#"{"sku":"C-3","order_id":200}"#,
            r#"{"code":"us","name":"United States"}"#,
        ]
    );
    assert_eq!(stats.rows, 8);
}

#[test]
fn zero_limit_is_rejected_at_parse_time() {
    let args = |limit: &'static str| {
        [
            "joincrawl", "crawl", "-c", "config.json", "-f", "fixture.json", "--limit", limit,
        ]
    };

    assert!(Cli::try_parse_from(args("0")).is_err());
    assert!(Cli::try_parse_from(args("1")).is_ok());
}
