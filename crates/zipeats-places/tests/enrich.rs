//! Integration tests for batched detail enrichment using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zipeats_core::Genre;
use zipeats_places::{PlacesClient, PlacesOptions, RawPlace};

/// 2026-10-21 12:00 in UTC-5, a Wednesday.
fn wednesday_noon() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-21T12:00:00-05:00").expect("valid timestamp")
}

fn test_client(base_url: &str, batch_size: usize, batch_delay_ms: u64) -> PlacesClient {
    let options = PlacesOptions {
        batch_size,
        batch_delay: Duration::from_millis(batch_delay_ms),
        ..PlacesOptions::default()
    };
    PlacesClient::with_base_url("test-key", base_url, options)
        .expect("client construction should not fail")
}

fn raw_place(place_id: Option<&str>, name: &str, types: &[&str]) -> RawPlace {
    serde_json::from_value(serde_json::json!({
        "place_id": place_id,
        "name": name,
        "types": types,
    }))
    .expect("valid raw place")
}

fn details_ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "OK", "result": result }))
}

async fn mount_details(server: &MockServer, place_id: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", place_id))
        .and(query_param("fields", "opening_hours,current_opening_hours"))
        .and(query_param("key", "test-key"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn preserves_input_order_when_responses_finish_out_of_order() {
    let server = MockServer::start().await;
    // Later places answer first: p9 immediately, p0 after 270ms.
    for i in 0..10u64 {
        mount_details(
            &server,
            &format!("p{i}"),
            details_ok(serde_json::json!({ "current_opening_hours": { "open_now": i % 2 == 0 } }))
                .set_delay(Duration::from_millis((9 - i) * 30)),
        )
        .await;
    }

    let places: Vec<RawPlace> = (0..10)
        .map(|i| raw_place(Some(&format!("p{i}")), &format!("Place {i}"), &["restaurant"]))
        .collect();

    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("Place {i}")).collect();
    assert_eq!(names, expected);
    let open: Vec<Option<bool>> = records.iter().map(|r| r.is_open).collect();
    let expected_open: Vec<Option<bool>> = (0..10).map(|i| Some(i % 2 == 0)).collect();
    assert_eq!(open, expected_open);
}

#[tokio::test]
async fn genre_comes_from_name_and_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(details_ok(serde_json::json!({})))
        .mount(&server)
        .await;

    let places = vec![
        raw_place(Some("p0"), "Sushi Zen", &["restaurant"]),
        raw_place(Some("p1"), "Golden Spoon", &["cafe"]),
        raw_place(Some("p2"), "Corner Spot", &["bar"]),
    ];

    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    let genres: Vec<Genre> = records.iter().map(|r| r.genre).collect();
    assert_eq!(genres, vec![Genre::Japanese, Genre::Cafe, Genre::Bar]);
}

async fn mount_slow_details(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(
            details_ok(serde_json::json!({ "current_opening_hours": { "open_now": true } }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

fn ten_places() -> Vec<RawPlace> {
    (0..10)
        .map(|i| raw_place(Some(&format!("p{i}")), &format!("Place {i}"), &[]))
        .collect()
}

#[tokio::test]
async fn lookups_within_a_batch_run_concurrently() {
    let server = MockServer::start().await;
    mount_slow_details(&server, Duration::from_millis(200)).await;

    let client = test_client(&server.uri(), 10, 0);
    let started = Instant::now();
    let records = client.enrich_places(&ten_places(), wednesday_noon()).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.is_open == Some(true)));
    // Sequential lookups would need 2s.
    assert!(
        elapsed < Duration::from_millis(1000),
        "one batch of 10 took {elapsed:?}"
    );
}

#[tokio::test]
async fn batch_size_caps_lookups_in_flight() {
    let server = MockServer::start().await;
    mount_slow_details(&server, Duration::from_millis(200)).await;

    // Two batches of five, each bounded by one 200ms round trip.
    let client = test_client(&server.uri(), 5, 0);
    let started = Instant::now();
    let records = client.enrich_places(&ten_places(), wednesday_noon()).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 10);
    assert!(
        elapsed >= Duration::from_millis(400),
        "two batches of 5 finished in {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_millis(2000),
        "batches of 5 ran sequentially: {elapsed:?}"
    );
}

#[tokio::test]
async fn place_without_id_is_never_looked_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(details_ok(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let places = vec![raw_place(None, "Mystery Diner", &[])];
    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].is_open, None);
    assert_eq!(records[0].genre, Genre::American);
}

#[tokio::test]
async fn failed_lookups_degrade_single_records() {
    let server = MockServer::start().await;
    mount_details(
        &server,
        "denied",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "NOT_FOUND",
            "error_message": "gone"
        })),
    )
    .await;
    mount_details(&server, "broken", ResponseTemplate::new(500)).await;
    mount_details(
        &server,
        "garbled",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;
    mount_details(
        &server,
        "fine",
        details_ok(serde_json::json!({ "current_opening_hours": { "open_now": true } })),
    )
    .await;

    let places = vec![
        raw_place(Some("denied"), "A", &[]),
        raw_place(Some("broken"), "B", &[]),
        raw_place(Some("garbled"), "C", &[]),
        raw_place(Some("fine"), "D", &[]),
    ];
    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    let open: Vec<Option<bool>> = records.iter().map(|r| r.is_open).collect();
    assert_eq!(open, vec![None, None, None, Some(true)]);
}

#[tokio::test]
async fn periods_are_evaluated_against_the_run_timestamp() {
    let server = MockServer::start().await;
    mount_details(
        &server,
        "lunch",
        details_ok(serde_json::json!({
            "opening_hours": {
                "periods": [{
                    "open": { "day": 3, "time": "1100" },
                    "close": { "day": 3, "time": "1400" }
                }]
            }
        })),
    )
    .await;
    mount_details(
        &server,
        "dinner",
        details_ok(serde_json::json!({
            "opening_hours": {
                "periods": [{
                    "open": { "day": 3, "time": "1700" },
                    "close": { "day": 3, "time": "2200" }
                }]
            }
        })),
    )
    .await;

    let places = vec![
        raw_place(Some("lunch"), "Lunch Spot", &[]),
        raw_place(Some("dinner"), "Dinner Spot", &[]),
    ];
    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    assert_eq!(records[0].is_open, Some(true));
    assert_eq!(records[1].is_open, Some(false));
}

#[tokio::test]
async fn periods_with_no_usable_open_point_mean_closed() {
    let server = MockServer::start().await;
    mount_details(
        &server,
        "close-only",
        details_ok(serde_json::json!({
            "opening_hours": { "periods": [{ "close": { "day": 3, "time": "1700" } }] }
        })),
    )
    .await;
    mount_details(
        &server,
        "no-periods",
        details_ok(serde_json::json!({ "opening_hours": { "periods": [] } })),
    )
    .await;

    let places = vec![
        raw_place(Some("close-only"), "Close Only", &[]),
        raw_place(Some("no-periods"), "No Periods", &[]),
    ];
    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&places, wednesday_noon()).await;

    assert_eq!(records[0].is_open, Some(false));
    assert_eq!(records[1].is_open, None);
}

#[tokio::test]
async fn batches_run_sequentially_with_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(details_ok(serde_json::json!({})))
        .expect(5)
        .mount(&server)
        .await;

    let places: Vec<RawPlace> = (0..5)
        .map(|i| raw_place(Some(&format!("p{i}")), &format!("Place {i}"), &[]))
        .collect();

    // Batches of two: three batches, two inter-batch pauses.
    let client = test_client(&server.uri(), 2, 60);
    let started = Instant::now();
    let records = client.enrich_places(&places, wednesday_noon()).await;

    assert_eq!(records.len(), 5);
    assert!(started.elapsed() >= Duration::from_millis(120));
    let names: Vec<String> = records.into_iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec!["Place 0", "Place 1", "Place 2", "Place 3", "Place 4"]
    );
}

#[tokio::test]
async fn price_level_passes_through_unchanged() {
    let server = MockServer::start().await;
    mount_details(&server, "p", details_ok(serde_json::json!({}))).await;

    let place: RawPlace = serde_json::from_value(serde_json::json!({
        "place_id": "p",
        "name": "Pricey Place",
        "types": ["restaurant"],
        "price_level": 4
    }))
    .expect("valid raw place");

    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&[place], wednesday_noon()).await;
    assert_eq!(records[0].price_level, Some(4));
    assert_eq!(records[0].is_open, None);
}

#[tokio::test]
async fn empty_input_makes_no_requests() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri(), 10, 0);
    let records = client.enrich_places(&[], wednesday_noon()).await;
    assert!(records.is_empty());
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
