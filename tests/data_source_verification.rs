//! Data Source Verification Integration Tests
//!
//! These tests hit the live case feed and report how it joins against local
//! reference files. They depend on network access, so they are ignored by
//! default.
//!
//! Run with: cargo test --test data_source_verification -- --ignored

use curve_service::config::{DEFAULT_CASE_FEED_URL, default_cutoff_date};
use curve_service::ingest::nyt;
use curve_service::pipeline::{ReferenceData, build_timeseries};
use curve_service::states::UsState;
use curve_service::verify::*;

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_live_case_feed_parses() {
    let client = nyt::build_client(30).unwrap();
    let text = nyt::fetch_feed_text(&client, DEFAULT_CASE_FEED_URL).expect("feed should be reachable");
    let rows = nyt::parse_case_feed(&text).expect("feed should parse");

    println!("\n🔍 Case feed: {} rows", rows.len());
    assert!(!rows.is_empty(), "feed returned no rows");

    // Every lookup entry should appear in the feed under its full name
    for state in UsState::ALL {
        assert!(
            rows.iter().any(|r| r.state == state.name()),
            "feed has no rows for '{}'",
            state
        );
    }
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_live_feed_coverage_report() {
    let rows = nyt::load_case_feed(DEFAULT_CASE_FEED_URL, 30).expect("feed should load");
    let records = build_timeseries(rows, &ReferenceData::default(), default_cutoff_date())
        .expect("feed should have rows after the cutoff");

    let report = coverage_report(&records, &ReferenceData::default());
    print_summary(&report);

    let md = generate_markdown_report(&report);
    println!("{}", md);

    // Without reference tables nothing can join
    assert_eq!(report.summary.unmatched, report.summary.total);
}
