//! Resolution of the ROS process environment.
//!
//! [`RosEnvironment`] is the single place where environment variables are
//! read.  The settings object receives a fully resolved struct, which makes it
//! easy to construct in tests without touching the real environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use nm_core::domain::defaults;
use tracing::warn;

use super::package::find_package_dir;

/// Overrides the ROS home directory (default `~/.ros`).
pub const ROS_HOME_VAR: &str = "ROS_HOME";
/// Overrides the ROS log directory (default `~/.ros/log`).
pub const ROS_LOG_DIR_VAR: &str = "ROS_LOG_DIR";
/// URI of the ROS master.
pub const ROS_MASTER_URI_VAR: &str = "ROS_MASTER_URI";
/// Search path for ROS packages.
pub const ROS_PACKAGE_PATH_VAR: &str = "ROS_PACKAGE_PATH";

/// Paths and URIs derived from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosEnvironment {
    /// The user's home directory.
    pub home: PathBuf,
    /// `$ROS_HOME`, or `<home>/.ros`.
    pub ros_home: PathBuf,
    /// `$ROS_LOG_DIR`, or `<home>/.ros/log`.
    pub log_dir: PathBuf,
    /// `$ROS_MASTER_URI`, or `http://localhost:11311/`.
    pub master_uri: String,
    /// Directory of the `node_manager_fkie` package.
    pub package_dir: PathBuf,
}

impl RosEnvironment {
    /// Resolves the environment of the current process.
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            warn!("could not determine home directory, using current directory");
            PathBuf::from(".")
        });
        Self::from_lookup(home, |name| std::env::var_os(name))
    }

    /// Resolves the environment using `lookup` in place of `std::env::var_os`.
    pub fn from_lookup<F>(home: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let ros_home = non_empty(ROS_HOME_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".ros"));
        let log_dir = non_empty(ROS_LOG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".ros").join("log"));
        let master_uri = non_empty(ROS_MASTER_URI_VAR)
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_else(|| defaults::MASTER_URI.to_string());
        let package_dir = non_empty(ROS_PACKAGE_PATH_VAR)
            .and_then(|path| find_package_dir(defaults::PACKAGE_NAME, &path))
            .unwrap_or_else(|| {
                warn!(
                    "package {} not found in ${ROS_PACKAGE_PATH_VAR}, using current directory",
                    defaults::PACKAGE_NAME
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            });

        Self {
            home,
            ros_home,
            log_dir,
            master_uri,
            package_dir,
        }
    }

    /// Builds an environment rooted at `home` with every value at its default
    /// and the package directory at `<home>/node_manager_fkie`.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            ros_home: home.join(".ros"),
            log_dir: home.join(".ros").join("log"),
            master_uri: defaults::MASTER_URI.to_string(),
            package_dir: home.join(defaults::PACKAGE_NAME),
            home,
        }
    }

    /// Replaces the ROS home directory.
    pub fn with_ros_home(mut self, ros_home: impl Into<PathBuf>) -> Self {
        self.ros_home = ros_home.into();
        self
    }

    /// The default configuration directory: `<ros_home>/node_manager`.
    pub fn default_cfg_path(&self) -> PathBuf {
        self.ros_home.join(defaults::CFG_DIR_NAME)
    }

    /// The default robot image directory: `<package_dir>/images`.
    pub fn robots_dir(&self) -> PathBuf {
        self.package_dir.join(defaults::ROBOTS_DIR_NAME)
    }

    /// The package help document.
    pub fn help_file(&self) -> PathBuf {
        self.package_dir.join(defaults::HELP_FILE_NAME)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_derived_from_home() {
        // Arrange / Act
        let env = RosEnvironment::from_lookup(PathBuf::from("/home/u"), lookup_from(&[]));

        // Assert
        assert_eq!(env.ros_home, PathBuf::from("/home/u/.ros"));
        assert_eq!(env.log_dir, PathBuf::from("/home/u/.ros/log"));
        assert_eq!(env.master_uri, "http://localhost:11311/");
        assert_eq!(env.default_cfg_path(), PathBuf::from("/home/u/.ros/node_manager"));
    }

    #[test]
    fn test_variables_override_defaults() {
        let env = RosEnvironment::from_lookup(
            PathBuf::from("/home/u"),
            lookup_from(&[
                ("ROS_HOME", "/data/ros"),
                ("ROS_LOG_DIR", "/var/log/ros"),
                ("ROS_MASTER_URI", "http://robot:11311"),
            ]),
        );

        assert_eq!(env.ros_home, PathBuf::from("/data/ros"));
        assert_eq!(env.log_dir, PathBuf::from("/var/log/ros"));
        assert_eq!(env.master_uri, "http://robot:11311");
    }

    #[test]
    fn test_empty_variables_are_treated_as_unset() {
        let env = RosEnvironment::from_lookup(
            PathBuf::from("/home/u"),
            lookup_from(&[("ROS_LOG_DIR", ""), ("ROS_HOME", "")]),
        );

        assert_eq!(env.log_dir, PathBuf::from("/home/u/.ros/log"));
        assert_eq!(env.ros_home, PathBuf::from("/home/u/.ros"));
    }

    #[test]
    fn test_package_dir_resolved_from_package_path() {
        let ws = tempfile::tempdir().unwrap();
        let pkg = ws.path().join("src").join("node_manager_fkie");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("package.xml"), "<package/>").unwrap();
        let package_path = ws.path().to_string_lossy().into_owned();

        let env = RosEnvironment::from_lookup(
            PathBuf::from("/home/u"),
            lookup_from(&[("ROS_PACKAGE_PATH", package_path.as_str())]),
        );

        assert_eq!(env.package_dir, pkg);
        assert_eq!(env.robots_dir(), pkg.join("images"));
        assert_eq!(env.help_file(), pkg.join("README.rst"));
    }
}
