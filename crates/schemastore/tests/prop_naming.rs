//! Property-based tests for the name/path mapping

use proptest::prelude::*;
use schemastore::loader::{make_fullname, name_to_path, path_to_name};
use std::path::Path;

/// Strategy for generating dotted fully-qualified names
fn fullname_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,12}", 1..5).prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn prop_path_maps_back_to_name(fullname in fullname_strategy()) {
        let root = Path::new("/schemas");
        let path = root.join(name_to_path(&fullname, "avsc").unwrap());
        prop_assert_eq!(path_to_name(root, &path, "avsc").unwrap(), fullname);
    }

    #[test]
    fn prop_namespace_prefixes_local_name(
        namespace in fullname_strategy(),
        name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
    ) {
        let fullname = make_fullname(&name, Some(namespace.as_str())).unwrap();
        prop_assert_eq!(fullname, format!("{}.{}", namespace, name));
    }

    #[test]
    fn prop_qualified_name_ignores_namespace(
        fullname in fullname_strategy().prop_filter("qualified", |n| n.contains('.')),
        namespace in fullname_strategy(),
    ) {
        prop_assert_eq!(make_fullname(&fullname, Some(namespace.as_str())).unwrap(), fullname);
    }
}
