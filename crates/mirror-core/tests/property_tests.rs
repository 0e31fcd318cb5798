//! Property tests for ignore rules

use std::path::PathBuf;

use mirror_core::IgnoreMatcher;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

fn absolute(relative: &str) -> PathBuf {
    PathBuf::from("/site").join(relative)
}

proptest! {
    #[test]
    fn no_patterns_never_ignore(parts in relative_path()) {
        let relative = parts.join("/");
        let filename = parts.last().unwrap().clone();
        let matcher = IgnoreMatcher::new(Vec::<String>::new());
        prop_assert!(!matcher.is_ignored(&relative, &filename, &absolute(&relative)));
    }

    #[test]
    fn directory_pattern_covers_descendants(dir in segment(), rest in relative_path()) {
        let matcher = IgnoreMatcher::new([format!("{}/", dir)]);
        let relative = format!("{}/{}", dir, rest.join("/"));
        let filename = rest.last().unwrap().clone();

        prop_assert!(matcher.is_ignored(&dir, &dir, &absolute(&dir)));
        prop_assert!(matcher.is_ignored(&relative, &filename, &absolute(&relative)));
    }

    #[test]
    fn directory_pattern_respects_prefix_boundary(dir in segment(), suffix in segment(), name in segment()) {
        let matcher = IgnoreMatcher::new([format!("{}/", dir)]);
        let sibling = format!("{}{}", dir, suffix);
        let relative = format!("{}/{}.txt", sibling, name);
        let filename = format!("{}.txt", name);

        prop_assert!(!matcher.is_ignored(&relative, &filename, &absolute(&relative)));
    }

    #[test]
    fn extension_glob_matches_exactly_that_extension(parts in relative_path(), ext in "[a-z]{1,4}") {
        let matcher = IgnoreMatcher::new([format!("*.{}", ext)]);
        let stem = parts.join("/");

        let hit = format!("{}.{}", stem, ext);
        let hit_name = format!("{}.{}", parts.last().unwrap(), ext);
        prop_assert!(matcher.is_ignored(&hit, &hit_name, &absolute(&hit)));

        let miss = format!("{}.{}x", stem, ext);
        let miss_name = format!("{}.{}x", parts.last().unwrap(), ext);
        prop_assert!(!matcher.is_ignored(&miss, &miss_name, &absolute(&miss)));
    }

    #[test]
    fn literal_name_matches_anywhere(parts in relative_path()) {
        let filename = parts.last().unwrap().clone();
        let matcher = IgnoreMatcher::new([filename.clone()]);
        let relative = parts.join("/");
        prop_assert!(matcher.is_ignored(&relative, &filename, &absolute(&relative)));
    }
}
