use archdiff::ignore::IgnoreFilter;
use archdiff::reconcile::{FileRecord, FileSet, set_ops};
use proptest::prelude::*;
use std::collections::HashSet;

fn record_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{1,2}(/[a-c]{1,2}){0,2}", 0..40)
}

fn to_set(names: &[String]) -> FileSet {
    names.iter().map(|n| FileRecord::new(n.as_str())).collect()
}

proptest! {
    #[test]
    fn test_difference_is_from_minus_exclude(from in record_names(), exclude in record_names()) {
        let from = to_set(&from);
        let exclude = to_set(&exclude);
        let index = set_ops::name_index(&exclude);
        let result = set_ops::difference(&from, &index);

        for record in &result {
            prop_assert!(!index.contains(record.name.as_str()));
        }
        let expected: Vec<&FileRecord> = from
            .iter()
            .filter(|r| !index.contains(r.name.as_str()))
            .collect();
        prop_assert_eq!(result.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_difference_with_self_is_empty(names in record_names()) {
        let set = to_set(&names);
        prop_assert!(set_ops::difference(&set, &set_ops::name_index(&set)).is_empty());
    }

    #[test]
    fn test_more_patterns_ignore_more(
        names in record_names(),
        patterns in prop::collection::vec("/[a-c]{1,2}(/\\*)?", 0..4),
        extra in "/[a-c]{1,2}(/\\*)?",
    ) {
        let base = IgnoreFilter::new(&patterns).unwrap();
        let mut extended_patterns = patterns.clone();
        extended_patterns.push(extra);
        let extended = IgnoreFilter::new(&extended_patterns).unwrap();

        let ignored_by_base: HashSet<&String> =
            names.iter().filter(|n| base.is_ignored_name(n)).collect();
        for name in &ignored_by_base {
            prop_assert!(extended.is_ignored_name(name));
        }
    }
}
