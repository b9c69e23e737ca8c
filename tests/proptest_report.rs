//! Property-based tests using proptest
//!
//! These tests verify location sorting, external IP extraction and row
//! formatting using randomized inputs.

use gcp_inventory::config::UsersFormat;
use gcp_inventory::report::compute::{external_ip, users_summary, NO_EXTERNAL_IP};
use gcp_inventory::report::printer::join_fields;
use gcp_inventory::resource::sorted_names;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate zone-like names
fn arb_zone() -> impl Strategy<Value = String> {
    "[a-z]{2,12}-[a-z]{2,8}[0-9]-[a-f]"
}

/// An instance where each level of the external IP path may be missing
fn arb_instance() -> impl Strategy<Value = (Value, Option<String>)> {
    (
        0usize..5,
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    )
        .prop_map(|(depth, ip)| match depth {
            0 => (json!({"name": "vm"}), None),
            1 => (json!({"networkInterfaces": []}), None),
            2 => (json!({"networkInterfaces": [{"networkIP": "10.0.0.1"}]}), None),
            3 => (
                json!({"networkInterfaces": [{"accessConfigs": [{"type": "ONE_TO_ONE_NAT"}]}]}),
                None,
            ),
            _ => (
                json!({"networkInterfaces": [{"accessConfigs": [{"natIP": ip.clone()}]}]}),
                Some(ip),
            ),
        })
}

/// Arbitrary JSON values, to make sure extraction never panics
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9.]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map(
                prop_oneof!["networkInterfaces", "accessConfigs", "natIP", "[a-z]{1,6}"],
                inner,
                0..4
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Location names are sorted whatever order they arrive in
    #[test]
    fn zone_names_are_sorted(zones in prop::collection::vec(arb_zone(), 0..50)) {
        let items: Vec<Value> = zones.iter().map(|z| json!({"name": z})).collect();
        let names = sorted_names(&items, "zone").unwrap();

        prop_assert_eq!(names.len(), zones.len());
        prop_assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Page order does not change the result
    #[test]
    fn zone_order_is_deterministic(zones in prop::collection::vec(arb_zone(), 0..50)) {
        let forward: Vec<Value> = zones.iter().map(|z| json!({"name": z})).collect();
        let backward: Vec<Value> = forward.iter().rev().cloned().collect();

        prop_assert_eq!(
            sorted_names(&forward, "zone").unwrap(),
            sorted_names(&backward, "zone").unwrap()
        );
    }

    /// External IP is the NAT IP when present and the sentinel otherwise
    #[test]
    fn external_ip_matches_path((instance, expected) in arb_instance()) {
        let ip = external_ip(&instance);
        match expected {
            Some(expected) => prop_assert_eq!(ip, expected),
            None => prop_assert_eq!(ip, NO_EXTERNAL_IP),
        }
    }

    /// Extraction never panics on arbitrary JSON
    #[test]
    fn external_ip_total(value in arb_json()) {
        let _ = external_ip(&value);
    }

    /// Joined rows have one delimiter between fields plus any embedded ones
    #[test]
    fn row_delimiters(fields in prop::collection::vec("[a-z,]{0,8}", 1..10)) {
        let line = join_fields(&fields);
        let embedded: usize = fields.iter().map(|f| f.matches(',').count()).sum();
        prop_assert_eq!(line.matches(',').count(), embedded + fields.len() - 1);
    }

    /// The lossy users summary never contains a path separator
    #[test]
    fn users_summary_is_a_short_name(users in prop::collection::vec("[a-z/]{0,20}", 0..5)) {
        prop_assert!(!users_summary(&users, UsersFormat::Last).contains('/'));
        prop_assert!(!users_summary(&users, UsersFormat::All).contains('/'));
    }
}
