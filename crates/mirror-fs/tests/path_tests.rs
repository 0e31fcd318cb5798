use mirror_fs::NormalizedPath;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("/www");
    assert_eq!(base.join("css").as_str(), "/www/css");
}

#[test]
fn test_join_trailing_slash_base() {
    let base = NormalizedPath::new("/www/");
    assert_eq!(base.join("css/theme").as_str(), "/www/css/theme");
}

#[test]
fn test_join_empty_segment_is_identity() {
    let base = NormalizedPath::new("/www");
    assert_eq!(base.join(""), base);
}

#[test]
fn test_join_normalizes_segment() {
    let base = NormalizedPath::new("/www");
    assert_eq!(base.join("a\\b").as_str(), "/www/a/b");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
}

#[test]
fn test_parent_of_top_level() {
    assert_eq!(NormalizedPath::new("/www").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("file.txt").parent().is_none());
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("foo/bar/baz.txt");
    assert_eq!(path.file_name(), Some("baz.txt"));
}

#[test]
fn test_extension() {
    assert_eq!(NormalizedPath::new("conf/app.JSON").extension(), Some("JSON"));
    assert_eq!(NormalizedPath::new("conf/.env").extension(), None);
}
