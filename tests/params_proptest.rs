//! Property tests for parameter capture and path cleaning.

mod common;

use common::*;
use pathmux::*;
use proptest::prelude::*;

fn segment_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,7}", 1..6)
}

proptest! {
    #[test]
    fn prop_wildcard_params_follow_pattern_order(
        names in segment_names(),
        values in prop::collection::vec("[A-Za-z0-9 _.~é-]{1,12}", 6),
    ) {
        let pattern: String = names.iter().map(|n| format!("/:{n}")).collect();
        let request: String = names
            .iter()
            .zip(&values)
            .map(|(_, v)| format!("/{}", encode_path(v)))
            .collect();

        let mut router = Router::with_config(exact_config());
        router.get(&pattern, "handler").unwrap();

        let result = router.lookup("GET", &request, "");
        let params = result.params().cloned().unwrap_or_default();
        let got: Vec<(&str, &str)> = params.iter().collect();
        let want: Vec<(&str, &str)> = names
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
            .collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_catch_all_captures_decoded_rest(
        prefix in "[a-z]{1,8}",
        rest in prop::collection::vec("[a-z0-9 ]{1,6}", 1..5),
    ) {
        let rest = rest.join("/");
        let mut router = Router::with_config(exact_config());
        router.get(&format!("/{prefix}/*rest"), "files").unwrap();

        let result = router.lookup("GET", &format!("/{prefix}/{}", encode_path(&rest)), "");
        prop_assert_eq!(result.params().and_then(|p| p.get("rest")), Some(rest.as_str()));
    }

    #[test]
    fn prop_clean_path_is_idempotent(path in "[a-z./]{0,24}") {
        let once = clean_path(&path).into_owned();
        prop_assert!(once.starts_with('/'));
        prop_assert!(!once.contains("//"));
        let twice = clean_path(&once).into_owned();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_lookup_never_panics(uri in "/\\PC{0,32}", method in "GET|POST|OPTIONS|HEAD") {
        let router = router_with(&[
            ("GET", "/"),
            ("GET", "/a/:b/c"),
            ("POST", "/a/*rest"),
            ("GET", r"/r/~^(?P<x>[0-9]+)$"),
            ("GET", "/s/"),
        ]);
        let first = router.lookup(&method, &uri, "");
        let second = router.lookup(&method, &uri, "");
        prop_assert_eq!(first, second);
    }
}
