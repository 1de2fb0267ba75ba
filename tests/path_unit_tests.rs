//! Unit tests for path utilities

use argspec::utils::{expand_home, normalize_path};
use std::path::{Path, PathBuf};

#[test]
fn normalize_path_tst() {
    assert_eq!(normalize_path(Path::new("./a/../b/./c")), PathBuf::from("b/c"));

    assert_eq!(normalize_path(Path::new("../a/b")), PathBuf::from("../a/b"));

    assert_eq!(normalize_path(Path::new("a/b/../..")), PathBuf::from("."));

    assert_eq!(normalize_path(Path::new("/../etc")), PathBuf::from("/etc"));
}

#[test]
fn expand_home_tst() {
    let home = Path::new("/home/ada");

    assert_eq!(expand_home("~", Some(home)), PathBuf::from("/home/ada"));
    assert_eq!(expand_home("~/src", Some(home)), PathBuf::from("/home/ada/src"));

    // Only a leading tilde on its own is expanded
    assert_eq!(expand_home("~bob/src", Some(home)), PathBuf::from("~bob/src"));
    assert_eq!(expand_home("src/~", Some(home)), PathBuf::from("src/~"));

    assert_eq!(expand_home("~/src", None), PathBuf::from("~/src"));
}
