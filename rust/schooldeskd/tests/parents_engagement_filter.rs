mod test_support;

use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

#[test]
fn engagement_buckets_partition_the_parents() {
    let mut sc = spawn_sidecar();

    let mut total = 0;
    for (i, (bucket, lo, hi)) in [("high", 70, 101), ("medium", 40, 70), ("low", 0, 40)]
        .iter()
        .enumerate()
    {
        let res = request_ok(
            &mut sc,
            &format!("b{}", i),
            "parents.list",
            json!({ "query": { "filters": { "engagement": bucket }, "pageSize": 500 } }),
        );
        let rows = res["rows"].as_array().expect("rows");
        assert_eq!(res["totalCount"].as_u64(), Some(rows.len() as u64));
        for r in rows {
            let score = r["engagementScore"].as_i64().expect("score");
            assert!(score >= *lo && score < *hi, "{} outside {}", score, bucket);
        }
        total += rows.len();
    }
    assert_eq!(total, 80);

    let stats = request_ok(&mut sc, "s", "parents.stats", json!({}));
    let counted: u64 = stats
        .pointer("/labeledCounts/engagement")
        .and_then(|v| v.as_array())
        .expect("engagement counts")
        .iter()
        .map(|c| c["count"].as_u64().expect("count"))
        .sum();
    assert_eq!(counted, 80);
}

#[test]
fn engagement_sort_and_combined_filters() {
    let mut sc = spawn_sidecar();

    let res = request_ok(
        &mut sc,
        "1",
        "parents.list",
        json!({ "query": {
            "filters": { "relation": "mother", "engagement": "high" },
            "sortBy": "engagement",
            "sortDir": "desc",
            "pageSize": 500
        } }),
    );
    let rows = res["rows"].as_array().expect("rows");
    assert!(rows.iter().all(|r| r["relation"].as_str() == Some("mother")));
    let scores: Vec<i64> = rows
        .iter()
        .map(|r| r["engagementScore"].as_i64().expect("score"))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let options = request_ok(&mut sc, "2", "parents.options", json!({ "locale": "en" }));
    let engagement = options["filters"]
        .as_array()
        .expect("filters")
        .iter()
        .find(|f| f["name"].as_str() == Some("engagement"))
        .expect("engagement filter");
    assert_eq!(engagement["kind"].as_str(), Some("range"));
    let tags: Vec<&str> = engagement["values"]
        .as_array()
        .expect("values")
        .iter()
        .map(|v| v["tag"].as_str().expect("tag"))
        .collect();
    assert_eq!(tags, vec!["high", "medium", "low"]);
}

#[test]
fn children_are_searchable_by_name() {
    let mut sc = spawn_sidecar();
    let opened = request_ok(&mut sc, "1", "students.open", json!({ "id": "ST-005" }));
    let parent_id = opened["record"]["parentId"].as_str().expect("parentId").to_string();
    let first_name = opened["record"]["firstName"].as_str().expect("firstName").to_string();
    let last_name = opened["record"]["lastName"].as_str().expect("lastName").to_string();

    let res = request_ok(
        &mut sc,
        "2",
        "parents.list",
        json!({ "query": { "search": format!("{} {}", first_name, last_name), "pageSize": 500 } }),
    );
    let found: Vec<&str> = res["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r["id"].as_str().expect("id"))
        .collect();
    assert!(found.contains(&parent_id.as_str()), "{:?}", found);
}
