//! Verify the query-string parser and URL decoder against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector names a case, gives the input string, and the expected
//! result. A `null` expected decode result means decoding must fail. A decode
//! case with `"strict_error": true` decodes leniently to `expected` but must
//! be rejected by `try_decode_url`.

use std::collections::HashMap;

use http_facade::{decode_url, parse_query_string_to_map, try_decode_url, FacadeError};

// ---------------------------------------------------------------------------
// Query string
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let expected: HashMap<String, String> =
            serde_json::from_value(case["expected"].clone()).unwrap();

        assert_eq!(parse_query_string_to_map(input), expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[test]
fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let expected = case["expected"].as_str();
        let strict_error = case["strict_error"].as_bool().unwrap_or(false);

        assert_eq!(decode_url(input).as_deref(), expected, "{name}: decode_url");
        match expected {
            Some(text) if !strict_error => assert_eq!(try_decode_url(input).unwrap(), text, "{name}"),
            _ => assert!(
                matches!(try_decode_url(input), Err(FacadeError::Decode { .. })),
                "{name}: expected Decode error"
            ),
        }
    }
}
