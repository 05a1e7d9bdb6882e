//! ROS package lookup.
//!
//! Finds a package directory by walking the entries of `ROS_PACKAGE_PATH`
//! the way `rospack` does: a directory is a package if it contains a
//! `package.xml` (catkin) or `manifest.xml` (rosbuild).  The walk does not
//! descend into packages, skips directories marked with `CATKIN_IGNORE` or
//! `rospack_nosubdirs`, and stops at [`MAX_DEPTH`] levels below each root.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Maximum directory depth searched below each `ROS_PACKAGE_PATH` entry.
pub const MAX_DEPTH: usize = 5;

const MANIFESTS: [&str; 2] = ["package.xml", "manifest.xml"];
const IGNORE_MARKERS: [&str; 2] = ["CATKIN_IGNORE", "rospack_nosubdirs"];

/// Returns the directory of package `name` found under `package_path`, a
/// list of directories in the platform's `PATH` syntax.
pub fn find_package_dir(name: &str, package_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(package_path)
        .filter(|root| !root.as_os_str().is_empty())
        .find_map(|root| search(&root, name, 0))
}

fn is_package(dir: &Path) -> bool {
    MANIFESTS.iter().any(|m| dir.join(m).is_file())
}

fn search(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    if is_package(dir) {
        return (dir.file_name() == Some(OsStr::new(name))).then(|| {
            debug!("found package {name} at {}", dir.display());
            dir.to_path_buf()
        });
    }
    if depth >= MAX_DEPTH || IGNORE_MARKERS.iter().any(|m| dir.join(m).exists()) {
        return None;
    }

    let mut children: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            !path
                .file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect();
    children.sort();
    children
        .iter()
        .find_map(|child| search(child, name, depth + 1))
}
