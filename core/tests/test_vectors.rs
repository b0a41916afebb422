//! Verify request building against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names a configuration, an operation with its arguments and
//! the request that must come out of a fresh client. Query parameters are
//! compared as a map as well as through the encoded URL, so a mismatch
//! points at the offending parameter.

use std::collections::BTreeMap;

use tracking_core::{HttpMethod, HttpRequest, TrackerConfig, TrackingClient};

fn arg<'a>(args: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    args[key].as_str()
}

fn tags(args: &serde_json::Value) -> Vec<String> {
    args["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap().to_string())
        .collect()
}

fn build(client: &TrackingClient, operation: &str, args: &serde_json::Value) -> HttpRequest {
    let result = match operation {
        "app_start" => client.build_app_start(),
        "screen" => client.build_screen(arg(args, "path").unwrap(), arg(args, "name")),
        "event" => client.build_event(
            arg(args, "key").unwrap(),
            arg(args, "name").unwrap(),
            arg(args, "path").unwrap(),
            arg(args, "screen_name"),
        ),
        "add_tags" => client.build_add_tags(tags(args)),
        "remove_tags" => client.build_remove_tags(tags(args)),
        other => panic!("unknown operation: {other}"),
    };
    result.unwrap()
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config: TrackerConfig = serde_json::from_value(case["config"].clone()).unwrap();
        let client = TrackingClient::new(config);
        let expected = &case["expected_request"];

        let req = build(&client, case["operation"].as_str().unwrap(), &case["args"]);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert!(req.cookies.is_empty(), "{name}: fresh client sends no cookies");

        let expected_query: BTreeMap<String, String> =
            serde_json::from_value(expected["query"].clone()).unwrap();
        assert_eq!(req.query, expected_query, "{name}: query");
        assert_eq!(req.url(), expected["url"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> =
            serde_json::from_value(expected["headers"].clone()).unwrap();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }
}
