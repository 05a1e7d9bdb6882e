//! Setting keys.
//!
//! Every accessor of the settings object has exactly one [`SettingKey`].  Most
//! of them are persisted in `settings.ini` under the name returned by
//! [`SettingKey::as_str`]; `cfg_path` lives in the redirect file instead, and
//! a handful of keys are process-local and never written anywhere.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when parsing a key name that is not one of [`SettingKey::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown setting key: {0}")]
pub struct UnknownKeyError(pub String);

/// Where a key's value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Written to `settings.ini` in the effective configuration directory.
    SettingsFile,
    /// Written to the redirect file in the default configuration directory.
    RedirectFile,
    /// Kept in memory for the lifetime of the process only.
    ProcessLocal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    CfgPath,
    RobotsPath,
    DefaultUser,
    LaunchHistoryLength,
    ParamHistoryLength,
    CurrentDialogPath,
    LogViewer,
    StartRemoteScript,
    RespawnScript,
    LaunchViewFileExt,
    FollowIncludeFileExt,
    StoreGeometry,
}

impl SettingKey {
    /// All keys, in the order they are displayed.
    pub const ALL: [SettingKey; 12] = [
        SettingKey::CfgPath,
        SettingKey::RobotsPath,
        SettingKey::DefaultUser,
        SettingKey::LaunchHistoryLength,
        SettingKey::ParamHistoryLength,
        SettingKey::CurrentDialogPath,
        SettingKey::LogViewer,
        SettingKey::StartRemoteScript,
        SettingKey::RespawnScript,
        SettingKey::LaunchViewFileExt,
        SettingKey::FollowIncludeFileExt,
        SettingKey::StoreGeometry,
    ];

    /// The key name as written to the INI file.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::CfgPath => "cfg_path",
            SettingKey::RobotsPath => "robots_path",
            SettingKey::DefaultUser => "default_user",
            SettingKey::LaunchHistoryLength => "launch_history_length",
            SettingKey::ParamHistoryLength => "param_history_length",
            SettingKey::CurrentDialogPath => "current_dialog_path",
            SettingKey::LogViewer => "log_viewer",
            SettingKey::StartRemoteScript => "start_remote_script",
            SettingKey::RespawnScript => "respawn_script",
            SettingKey::LaunchViewFileExt => "launch_view_file_ext",
            SettingKey::FollowIncludeFileExt => "follow_include_file_ext",
            SettingKey::StoreGeometry => "store_geometry",
        }
    }

    pub fn persistence(self) -> Persistence {
        match self {
            SettingKey::CfgPath => Persistence::RedirectFile,
            SettingKey::CurrentDialogPath
            | SettingKey::LogViewer
            | SettingKey::StartRemoteScript
            | SettingKey::RespawnScript => Persistence::ProcessLocal,
            _ => Persistence::SettingsFile,
        }
    }

    /// `true` when a setter for this key writes to disk.
    pub fn is_persisted(self) -> bool {
        self.persistence() != Persistence::ProcessLocal
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = UnknownKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKeyError(s.to_string()))
    }
}
