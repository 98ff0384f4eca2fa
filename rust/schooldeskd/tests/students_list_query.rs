mod test_support;

use serde_json::json;
use test_support::{ids, request_err, request_ok, spawn_sidecar};

#[test]
fn class_filter_pages_and_clamps() {
    let mut sc = spawn_sidecar();

    let stats = request_ok(
        &mut sc,
        "1",
        "students.stats",
        json!({ "scope": "filtered", "query": { "filters": { "class": "NS1" } } }),
    );
    let expected = stats
        .pointer("/numericSummaries/total")
        .and_then(|v| v.as_u64())
        .expect("filtered total");
    assert!(expected > 5, "need more than one page of NS1 students");

    let first = request_ok(
        &mut sc,
        "2",
        "students.list",
        json!({ "query": { "filters": { "class": "NS1", "gender": "all" }, "pageSize": 5 } }),
    );
    assert_eq!(first["totalCount"].as_u64(), Some(expected));
    let pages = (expected + 4) / 5;
    assert_eq!(first["totalPages"].as_u64(), Some(pages));
    assert_eq!(first["rangeStart"].as_u64(), Some(1));
    assert_eq!(first["rangeEnd"].as_u64(), Some(5));
    assert_eq!(first["appliedFilters"], json!({ "class": "NS1" }));
    assert!(first["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .all(|r| r["className"].as_str() == Some("NS1")));

    let mut seen = Vec::new();
    for page in 1..=pages {
        let res = request_ok(
            &mut sc,
            &format!("p{}", page),
            "students.list",
            json!({ "query": { "filters": { "class": "NS1" }, "pageSize": 5, "page": page } }),
        );
        seen.extend(ids(&res["rows"]));
    }
    let all = request_ok(
        &mut sc,
        "3",
        "students.list",
        json!({ "query": { "filters": { "class": "NS1" }, "pageSize": 500 } }),
    );
    assert_eq!(seen, ids(&all["rows"]));

    let high = request_ok(
        &mut sc,
        "4",
        "students.list",
        json!({ "query": { "filters": { "class": "NS1" }, "pageSize": 5, "page": 999 } }),
    );
    assert_eq!(high["page"].as_u64(), Some(pages));
    assert_eq!(high["rangeEnd"].as_u64(), Some(expected));

    let low = request_ok(
        &mut sc,
        "5",
        "students.list",
        json!({ "query": { "filters": { "class": "NS1" }, "pageSize": 5, "page": -4 } }),
    );
    assert_eq!(low["page"].as_u64(), Some(1));
}

#[test]
fn empty_results_report_zero_ranges() {
    let mut sc = spawn_sidecar();
    let res = request_ok(
        &mut sc,
        "1",
        "students.list",
        json!({ "query": { "search": "zzzz-nobody", "page": 3 } }),
    );
    assert_eq!(res["totalCount"].as_u64(), Some(0));
    assert_eq!(res["totalPages"].as_u64(), Some(1));
    assert_eq!(res["page"].as_u64(), Some(1));
    assert_eq!(res["rangeStart"].as_u64(), Some(0));
    assert_eq!(res["rangeEnd"].as_u64(), Some(0));
    assert!(res["rows"].as_array().expect("rows").is_empty());
}

#[test]
fn descending_average_is_the_reverse_of_ascending() {
    let mut sc = spawn_sidecar();
    let averages = |v: &serde_json::Value| -> Vec<f64> {
        v["rows"]
            .as_array()
            .expect("rows")
            .iter()
            .map(|r| r["average"].as_f64().unwrap_or(0.0))
            .collect()
    };

    let asc = request_ok(
        &mut sc,
        "1",
        "students.list",
        json!({ "query": { "sortBy": "average", "sortDir": "asc", "pageSize": 500 } }),
    );
    let desc = request_ok(
        &mut sc,
        "2",
        "students.list",
        json!({ "query": { "sortBy": "average", "sortDir": "desc", "pageSize": 500 } }),
    );
    let asc_values = averages(&asc);
    let mut reversed = averages(&desc);
    reversed.reverse();
    assert_eq!(asc_values, reversed);
    assert!(asc_values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(desc["sortBy"].as_str(), Some("average"));
    assert_eq!(desc["sortDir"].as_str(), Some("desc"));

    // Ungraded students sort as 0.
    assert!(asc["rows"][0]["average"].is_null());
}

#[test]
fn search_is_case_insensitive_across_keys() {
    let mut sc = spawn_sidecar();

    let by_id = request_ok(
        &mut sc,
        "1",
        "students.list",
        json!({ "query": { "search": "  st-01 ", "pageSize": 50 } }),
    );
    assert_eq!(by_id["totalCount"].as_u64(), Some(10));
    assert_eq!(by_id["search"].as_str(), Some("st-01"));
    let mut found = ids(&by_id["rows"]);
    found.sort();
    let expected: Vec<String> = (10..20).map(|n| format!("ST-{:03}", n)).collect();
    assert_eq!(found, expected);

    let by_name = request_ok(
        &mut sc,
        "2",
        "students.list",
        json!({ "query": { "search": "KONÉ", "pageSize": 50 } }),
    );
    let rows = by_name["rows"].as_array().expect("rows");
    assert!(!rows.is_empty());
    assert!(rows
        .iter()
        .all(|r| r["lastName"].as_str() == Some("Koné")));
}

#[test]
fn unknown_sort_keys_and_filters_are_rejected_with_allowed_values() {
    let mut sc = spawn_sidecar();

    let e = request_err(
        &mut sc,
        "1",
        "students.list",
        json!({ "query": { "sortBy": "shoeSize" } }),
    );
    assert_eq!(e["code"].as_str(), Some("bad_params"));
    let allowed = e.pointer("/details/allowed").and_then(|v| v.as_array()).expect("allowed");
    assert!(allowed.iter().any(|v| v.as_str() == Some("average")));

    let e = request_err(
        &mut sc,
        "2",
        "students.list",
        json!({ "query": { "filters": { "class": "6eme" } } }),
    );
    assert_eq!(e["code"].as_str(), Some("bad_params"));
    assert_eq!(e.pointer("/details/field").and_then(|v| v.as_str()), Some("class"));

    let e = request_err(
        &mut sc,
        "3",
        "students.list",
        json!({ "query": { "filters": { "engagement": "high" } } }),
    );
    assert_eq!(e["code"].as_str(), Some("bad_params"));

    let e = request_err(&mut sc, "4", "students.list", json!({ "query": { "pageSize": 0 } }));
    assert_eq!(e["code"].as_str(), Some("bad_params"));
}
