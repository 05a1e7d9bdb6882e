//! Built-in defaults.
//!
//! These are the values a fresh installation starts with and the values the
//! settings loader falls back to whenever a key is missing from `settings.ini`.

use std::time::Duration;

/// Name of the ROS package whose `images/` directory holds the robot icons.
pub const PACKAGE_NAME: &str = "node_manager_fkie";

/// Subdirectory of the ROS home that holds the configuration.
pub const CFG_DIR_NAME: &str = "node_manager";

/// Name of the settings file inside the configuration directory.
pub const CFG_FILE: &str = "settings.ini";

/// Name of the file that relocates the configuration directory.
pub const CFG_REDIRECT_FILE: &str = "redirect";

/// History file of recently opened launch files.
pub const LAUNCH_HISTORY_FILE: &str = "launch.history";

/// History file of recently entered parameters.
pub const PARAM_HISTORY_FILE: &str = "param.history";

/// Subdirectory of the package directory holding robot images.
pub const ROBOTS_DIR_NAME: &str = "images";

/// Help document shipped with the package.
pub const HELP_FILE_NAME: &str = "README.rst";

/// Extension appended to robot names to find their image.
pub const ROBOT_IMAGE_EXT: &str = "png";

pub const USER_DEFAULT: &str = "robot";
pub const LAUNCH_HISTORY_LENGTH: usize = 5;
pub const PARAM_HISTORY_LENGTH: usize = 12;

pub const LOG_VIEWER: &str = "/usr/bin/less -fKLnQrSU";

/// Script used on remote hosts to start new ROS nodes.
pub const STARTER_SCRIPT: &str = "rosrun node_manager_fkie remote_nm.py";
pub const RESPAWN_SCRIPT: &str = "rosrun node_manager_fkie respawn";

/// Master URI used when `ROS_MASTER_URI` is not set.
pub const MASTER_URI: &str = "http://localhost:11311/";

pub const TIMEOUT_CONTROL: Duration = Duration::from_secs(5);
pub const TIMEOUT_UPDATES: Duration = Duration::from_secs(20);

/// File extensions opened in the launch file viewer.
pub const LAUNCH_VIEW_EXT: &[&str] = &[
    ".launch", ".yaml", ".conf", ".cfg", ".iface", ".sync", ".test",
];

/// File extensions followed when resolving `<include>` tags.
pub const FOLLOW_INCLUDED_EXT: &[&str] = &[
    ".launch", ".yaml", ".conf", ".cfg", ".iface", ".sync", ".test", ".xml",
];

pub const STORE_GEOMETRY: bool = true;

/// Terminal emulators probed by `terminal_cmd`, in order of preference.
pub const TERMINAL_EMULATORS: &[&str] = &["/usr/bin/x-terminal-emulator", "/usr/bin/xterm"];

/// Returns [`LAUNCH_VIEW_EXT`] as owned strings.
pub fn launch_view_ext() -> Vec<String> {
    LAUNCH_VIEW_EXT.iter().map(|s| s.to_string()).collect()
}

/// Returns [`FOLLOW_INCLUDED_EXT`] as owned strings.
pub fn follow_included_ext() -> Vec<String> {
    FOLLOW_INCLUDED_EXT.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_include_ext_is_launch_view_ext_plus_xml() {
        let launch = launch_view_ext();
        let follow = follow_included_ext();

        assert_eq!(follow.len(), launch.len() + 1);
        assert!(launch.iter().all(|e| follow.contains(e)));
        assert_eq!(follow.last().map(String::as_str), Some(".xml"));
    }

    #[test]
    fn test_history_lengths_match_shipped_defaults() {
        assert_eq!(LAUNCH_HISTORY_LENGTH, 5);
        assert_eq!(PARAM_HISTORY_LENGTH, 12);
    }

    #[test]
    fn test_timeouts_are_whole_seconds() {
        assert_eq!(TIMEOUT_CONTROL.as_secs(), 5);
        assert_eq!(TIMEOUT_UPDATES.as_secs(), 20);
    }
}
