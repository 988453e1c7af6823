use dirsync_fs::RelativePath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = RelativePath::from(s.as_str());
        let as_str = path.as_str();

        if cfg!(windows) {
            prop_assert!(!as_str.contains('\\'));
        }
        prop_assert!(!as_str.contains("//"));
        prop_assert!(!as_str.starts_with('/'));
        prop_assert!(!as_str.ends_with('/'));
        prop_assert!(path.segments().all(|segment| segment != "."));

        // Normalizing an already canonical path is the identity
        let again = RelativePath::from(as_str);
        prop_assert_eq!(path, again);
    }

    #[test]
    fn test_native_components_become_segments(segments in prop::collection::vec("[a-z0-9_\\\\-]{1,8}", 1..5)) {
        let root = std::path::Path::new("/srv/root");
        let mut native = root.to_path_buf();
        for segment in &segments {
            native.push(segment);
        }

        // Every native component is exactly one segment, so keys never collide
        let rel = RelativePath::from_root(root, &native).unwrap();
        if !cfg!(windows) {
            prop_assert_eq!(rel.segments().count(), segments.len());
            prop_assert_eq!(rel.to_native(root), native);
        }
    }
}
