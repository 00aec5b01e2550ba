//! Property tests for the truncation engine and the serde adapter.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::Serialize;

use fieldcap::*;

#[derive(Serialize)]
struct Holder {
    open: BTreeMap<String, String>,
    kept: BTreeMap<String, String>,
}

exempt_fields!(Holder => [kept]);

proptest! {
    #[test]
    fn length_is_min_of_input_and_bound(s in "\\PC{0,80}", max in 3usize..40) {
        let config = TruncationConfig::with_max_length(max).unwrap();
        let out = truncate(&s, &config, false);
        prop_assert_eq!(out.chars().count(), s.chars().count().min(max));
    }

    #[test]
    fn truncated_output_keeps_prefix_and_marker(s in "\\PC{0,80}", max in 3usize..40) {
        let config = TruncationConfig::with_max_length(max).unwrap();
        let out = truncate(&s, &config, false);
        if s.chars().count() > max {
            let keep = max - ELLIPSIS.len();
            prop_assert!(out.ends_with(ELLIPSIS));
            let head: String = out.chars().take(keep).collect();
            let expected: String = s.chars().take(keep).collect();
            prop_assert_eq!(head, expected);
        } else {
            prop_assert_eq!(&*out, s.as_str());
        }
    }

    #[test]
    fn exempt_is_identity(s in "\\PC{0,200}", max in 3usize..20) {
        let config = TruncationConfig::with_max_length(max).unwrap();
        let out = truncate(&s, &config, true);
        prop_assert_eq!(&*out, s.as_str());
    }

    #[test]
    fn truncation_is_idempotent(s in "\\PC{0,80}", max in 3usize..40) {
        let config = TruncationConfig::with_max_length(max).unwrap();
        let once = truncate(&s, &config, false).into_owned();
        let twice = truncate(&once, &config, false);
        prop_assert_eq!(&*twice, once.as_str());
    }

    #[test]
    fn exempt_container_entries_unchanged(
        entries in prop::collection::btree_map("[a-z]{1,8}", "\\PC{0,60}", 0..6),
    ) {
        let policy = TruncationPolicy::new(
            TruncationConfig::with_max_length(10).unwrap(),
            ExemptionRegistry::new().register::<Holder>(),
        );
        let holder = Holder { open: entries.clone(), kept: entries.clone() };
        let doc = to_value(&holder, &policy).unwrap();

        for (key, value) in &entries {
            prop_assert_eq!(doc["kept"][key].as_str().unwrap(), value.as_str());
            let open = doc["open"][key].as_str().unwrap();
            prop_assert_eq!(open.chars().count(), value.chars().count().min(10));
        }
    }
}
