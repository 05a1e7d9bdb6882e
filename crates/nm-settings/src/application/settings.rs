//! The settings object of the node manager.
//!
//! [`Settings`] caches every preference in memory and writes each change
//! straight through to disk.  A setter is always two steps: update the cached
//! field, then [`Settings::persist`] that key.  `persist` is public so the
//! second step can be exercised on its own.
//!
//! # Configuration directory and redirect file
//!
//! The default configuration directory is `<ros_home>/node_manager/`.  It can
//! be relocated without moving the default: [`Settings::set_cfg_path`] writes a
//! small `redirect` INI file into the default directory holding a single
//! `cfg_path` key.  On start-up the redirect is honoured if present, and
//! `settings.ini` is then read from the effective directory.
//!
//! ```text
//! ~/.ros/node_manager/
//!   redirect            cfg_path=/data/nm
//! /data/nm/
//!   settings.ini        default_user=robot
//!                       launch_history_length=5
//!                       ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use nm_core::domain::defaults;
use nm_core::domain::key::Persistence;
use nm_core::{str2bool, str2list, SettingKey, SettingValue};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::terminal::TerminalLauncher;
use crate::infrastructure::environment::RosEnvironment;
use crate::infrastructure::storage::{PreferenceStore, StoreError, StoreFactory};

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A configuration or robots directory could not be created.
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a preference file failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// `persist` was called for a key that only lives in memory.
    #[error("{0} is process-local and is never persisted")]
    NotPersisted(SettingKey),

    /// A textual value could not be converted to the key's type.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: SettingKey, value: String },
}

/// Node manager preferences with write-through persistence.
pub struct Settings {
    env: RosEnvironment,
    stores: Box<dyn StoreFactory>,
    terminal: TerminalLauncher,

    cfg_path: PathBuf,
    robots_path: PathBuf,
    default_user: String,
    launch_history_length: usize,
    param_history_length: usize,
    current_dialog_path: PathBuf,
    log_viewer: String,
    start_remote_script: String,
    respawn_script: String,
    launch_view_file_ext: Vec<String>,
    follow_include_file_ext: Vec<String>,
    store_geometry: bool,
}

/// A read-only copy of every setting, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    pub cfg_path: PathBuf,
    pub robots_path: PathBuf,
    pub default_user: String,
    pub launch_history_length: usize,
    pub param_history_length: usize,
    pub current_dialog_path: PathBuf,
    pub log_viewer: String,
    pub start_remote_script: String,
    pub respawn_script: String,
    pub launch_view_file_ext: Vec<String>,
    pub follow_include_file_ext: Vec<String>,
    pub store_geometry: bool,
    pub masteruri: String,
    pub log_path: PathBuf,
}

impl Settings {
    /// Resolves the configuration directory and loads `settings.ini`.
    ///
    /// The default directory is created if it does not exist.  If it exists
    /// and holds a redirect file, the directory named there is used instead
    /// (and created if needed).  Keys missing from `settings.ini` take their
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::CreateDir`] if a directory cannot be created
    /// and [`SettingsError::Store`] if a preference file cannot be read.
    pub fn open(env: RosEnvironment, stores: Box<dyn StoreFactory>) -> Result<Self, SettingsError> {
        let cfg_path = resolve_cfg_path(&env, stores.as_ref())?;
        let store = stores.open(&cfg_path.join(defaults::CFG_FILE))?;
        debug!("loading settings from {}", store.path().display());

        let default_user = store
            .get(SettingKey::DefaultUser.as_str())
            .map(|v| v.to_ini_string())
            .filter(|user| !user.is_empty())
            .unwrap_or_else(|| defaults::USER_DEFAULT.to_string());
        let robots_path = store
            .get(SettingKey::RobotsPath.as_str())
            .map(|v| v.to_ini_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env.robots_dir());
        let launch_history_length = read_length(
            store.as_ref(),
            SettingKey::LaunchHistoryLength,
            defaults::LAUNCH_HISTORY_LENGTH,
        );
        let param_history_length = read_length(
            store.as_ref(),
            SettingKey::ParamHistoryLength,
            defaults::PARAM_HISTORY_LENGTH,
        );
        let launch_view_file_ext = str2list(&store.get_or(
            SettingKey::LaunchViewFileExt.as_str(),
            defaults::launch_view_ext().into(),
        ));
        let follow_include_file_ext = str2list(&store.get_or(
            SettingKey::FollowIncludeFileExt.as_str(),
            defaults::follow_included_ext().into(),
        ));
        let store_geometry = str2bool(&store.get_or(
            SettingKey::StoreGeometry.as_str(),
            defaults::STORE_GEOMETRY.into(),
        ));

        Ok(Self {
            current_dialog_path: env.home().to_path_buf(),
            env,
            stores,
            terminal: TerminalLauncher::new(),
            cfg_path,
            robots_path,
            default_user,
            launch_history_length,
            param_history_length,
            log_viewer: defaults::LOG_VIEWER.to_string(),
            start_remote_script: defaults::STARTER_SCRIPT.to_string(),
            respawn_script: defaults::RESPAWN_SCRIPT.to_string(),
            launch_view_file_ext,
            follow_include_file_ext,
            store_geometry,
        })
    }

    /// Replaces the terminal launcher used by [`Settings::terminal_cmd`].
    pub fn with_terminal(mut self, terminal: TerminalLauncher) -> Self {
        self.terminal = terminal;
        self
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Writes the cached value of `key` to its file.
    ///
    /// `cfg_path` is written to the redirect file of the default directory,
    /// or the redirect file is removed when `cfg_path` is the default again.
    /// Every other persisted key is written to `settings.ini` in the
    /// effective configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPersisted`] for process-local keys and
    /// [`SettingsError::Store`] if the file cannot be written.
    pub fn persist(&self, key: SettingKey) -> Result<(), SettingsError> {
        match key.persistence() {
            Persistence::ProcessLocal => Err(SettingsError::NotPersisted(key)),
            Persistence::RedirectFile => {
                let redirect = self.redirect_file();
                if self.cfg_path == self.env.default_cfg_path() {
                    self.stores.remove(&redirect)?;
                    info!("configuration directory reset to default {}", self.cfg_path.display());
                } else {
                    self.stores
                        .open(&redirect)?
                        .set(key.as_str(), &self.value(key))?;
                    info!("configuration redirected to {}", self.cfg_path.display());
                }
                Ok(())
            }
            Persistence::SettingsFile => {
                let value = self.value(key);
                self.stores
                    .open(&self.settings_file())?
                    .set(key.as_str(), &value)?;
                info!("{key} = {value}");
                Ok(())
            }
        }
    }

    // ── Generic access ────────────────────────────────────────────────────────

    /// Returns the cached value of `key`.
    pub fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::CfgPath => self.cfg_path.as_path().into(),
            SettingKey::RobotsPath => self.robots_path.as_path().into(),
            SettingKey::DefaultUser => self.default_user.as_str().into(),
            SettingKey::LaunchHistoryLength => self.launch_history_length.into(),
            SettingKey::ParamHistoryLength => self.param_history_length.into(),
            SettingKey::CurrentDialogPath => self.current_dialog_path.as_path().into(),
            SettingKey::LogViewer => self.log_viewer.as_str().into(),
            SettingKey::StartRemoteScript => self.start_remote_script.as_str().into(),
            SettingKey::RespawnScript => self.respawn_script.as_str().into(),
            SettingKey::LaunchViewFileExt => self.launch_view_file_ext.clone().into(),
            SettingKey::FollowIncludeFileExt => self.follow_include_file_ext.clone().into(),
            SettingKey::StoreGeometry => self.store_geometry.into(),
        }
    }

    /// Sets `key` through its typed setter.
    ///
    /// Text given for a history length must parse as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] for an unparsable length, plus
    /// any error of the typed setter.
    pub fn set_value(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        match key {
            SettingKey::CfgPath => self.set_cfg_path(value.to_ini_string()),
            SettingKey::RobotsPath => self.set_robots_path(value.to_ini_string()),
            SettingKey::DefaultUser => self.set_default_user(value.to_ini_string()),
            SettingKey::LaunchHistoryLength => {
                let len = parse_length(key, &value)?;
                self.set_launch_history_length(len)
            }
            SettingKey::ParamHistoryLength => {
                let len = parse_length(key, &value)?;
                self.set_param_history_length(len)
            }
            SettingKey::CurrentDialogPath => {
                self.set_current_dialog_path(value.to_ini_string());
                Ok(())
            }
            SettingKey::LogViewer => {
                self.set_log_viewer(value.to_ini_string());
                Ok(())
            }
            SettingKey::StartRemoteScript => {
                self.set_start_remote_script(value.to_ini_string());
                Ok(())
            }
            SettingKey::RespawnScript => {
                self.set_respawn_script(value.to_ini_string());
                Ok(())
            }
            SettingKey::LaunchViewFileExt => self.set_launch_view_file_ext(value),
            SettingKey::FollowIncludeFileExt => self.set_follow_include_file_ext(value),
            SettingKey::StoreGeometry => self.set_store_geometry(value),
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            cfg_path: self.cfg_path.clone(),
            robots_path: self.robots_path.clone(),
            default_user: self.default_user.clone(),
            launch_history_length: self.launch_history_length,
            param_history_length: self.param_history_length,
            current_dialog_path: self.current_dialog_path.clone(),
            log_viewer: self.log_viewer.clone(),
            start_remote_script: self.start_remote_script.clone(),
            respawn_script: self.respawn_script.clone(),
            launch_view_file_ext: self.launch_view_file_ext.clone(),
            follow_include_file_ext: self.follow_include_file_ext.clone(),
            store_geometry: self.store_geometry,
            masteruri: self.env.master_uri.clone(),
            log_path: self.env.log_dir.clone(),
        }
    }

    // ── Typed accessors ───────────────────────────────────────────────────────

    /// The effective configuration directory.
    pub fn cfg_path(&self) -> &Path {
        &self.cfg_path
    }

    /// Relocates the configuration directory, creating it if needed.
    ///
    /// Setting the default path removes the redirect file; any other path is
    /// recorded in it.  Already cached values are kept and are written to the
    /// new location by subsequent setters.
    ///
    /// # Errors
    ///
    /// An empty path is [`SettingsError::InvalidValue`].  A directory that
    /// cannot be created is [`SettingsError::CreateDir`].
    pub fn set_cfg_path(&mut self, path: impl Into<PathBuf>) -> Result<(), SettingsError> {
        let path = non_empty_path(SettingKey::CfgPath, path.into())?;
        ensure_dir(&path)?;
        self.update(SettingKey::CfgPath, path, |s| &mut s.cfg_path)
    }

    /// Directory holding the robot images.
    pub fn robots_path(&self) -> &Path {
        &self.robots_path
    }

    pub fn set_robots_path(&mut self, path: impl Into<PathBuf>) -> Result<(), SettingsError> {
        let path = non_empty_path(SettingKey::RobotsPath, path.into())?;
        ensure_dir(&path)?;
        self.update(SettingKey::RobotsPath, path, |s| &mut s.robots_path)
    }

    /// User name used for remote hosts.
    pub fn default_user(&self) -> &str {
        &self.default_user
    }

    /// Sets the default user.  An empty name is ignored.
    pub fn set_default_user(&mut self, user: impl Into<String>) -> Result<(), SettingsError> {
        let user = user.into();
        if user.is_empty() {
            debug!("ignoring empty default user");
            return Ok(());
        }
        self.update(SettingKey::DefaultUser, user, |s| &mut s.default_user)
    }

    pub fn launch_history_length(&self) -> usize {
        self.launch_history_length
    }

    pub fn set_launch_history_length(&mut self, len: usize) -> Result<(), SettingsError> {
        self.update(SettingKey::LaunchHistoryLength, len, |s| {
            &mut s.launch_history_length
        })
    }

    pub fn param_history_length(&self) -> usize {
        self.param_history_length
    }

    pub fn set_param_history_length(&mut self, len: usize) -> Result<(), SettingsError> {
        self.update(SettingKey::ParamHistoryLength, len, |s| &mut s.param_history_length)
    }

    /// Last directory shown in a file dialog.  Not persisted.
    pub fn current_dialog_path(&self) -> &Path {
        &self.current_dialog_path
    }

    pub fn set_current_dialog_path(&mut self, path: impl Into<PathBuf>) {
        self.current_dialog_path = path.into();
    }

    /// Command used to page through log files.  Not persisted.
    pub fn log_viewer(&self) -> &str {
        &self.log_viewer
    }

    pub fn set_log_viewer(&mut self, viewer: impl Into<String>) {
        self.log_viewer = viewer.into();
    }

    /// Command run on remote hosts to start nodes.  Not persisted.
    pub fn start_remote_script(&self) -> &str {
        &self.start_remote_script
    }

    pub fn set_start_remote_script(&mut self, script: impl Into<String>) {
        self.start_remote_script = script.into();
    }

    pub fn respawn_script(&self) -> &str {
        &self.respawn_script
    }

    pub fn set_respawn_script(&mut self, script: impl Into<String>) {
        self.respawn_script = script.into();
    }

    /// Extensions of files shown in the launch file viewer.
    pub fn launch_view_file_ext(&self) -> &[String] {
        &self.launch_view_file_ext
    }

    /// Accepts a list or a list-shaped string such as `"['.launch', '.yaml']"`.
    pub fn set_launch_view_file_ext(
        &mut self,
        exts: impl Into<SettingValue>,
    ) -> Result<(), SettingsError> {
        self.update(SettingKey::LaunchViewFileExt, str2list(&exts.into()), |s| {
            &mut s.launch_view_file_ext
        })
    }

    /// Extensions of files followed when resolving includes.
    pub fn follow_include_file_ext(&self) -> &[String] {
        &self.follow_include_file_ext
    }

    pub fn set_follow_include_file_ext(
        &mut self,
        exts: impl Into<SettingValue>,
    ) -> Result<(), SettingsError> {
        self.update(SettingKey::FollowIncludeFileExt, str2list(&exts.into()), |s| {
            &mut s.follow_include_file_ext
        })
    }

    /// Whether window geometry is restored between sessions.
    pub fn store_geometry(&self) -> bool {
        self.store_geometry
    }

    /// Accepts a bool or a string such as `"yes"` or `"0"`.
    pub fn set_store_geometry(&mut self, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        self.update(SettingKey::StoreGeometry, str2bool(&value.into()), |s| {
            &mut s.store_geometry
        })
    }

    /// Stores `value` in the field selected by `field` and persists `key`.
    ///
    /// The previous value is restored if persisting fails, so the cache never
    /// holds a value that is not on disk.
    fn update<T>(
        &mut self,
        key: SettingKey,
        value: T,
        field: fn(&mut Self) -> &mut T,
    ) -> Result<(), SettingsError> {
        let prev = std::mem::replace(field(self), value);
        if let Err(err) = self.persist(key) {
            *field(self) = prev;
            return Err(err);
        }
        Ok(())
    }

    // ── Derived values ────────────────────────────────────────────────────────

    /// Image shown for `robot_name`: `<robots_path>/<robot_name>.png`.
    pub fn robot_image_file(&self, robot_name: &str) -> PathBuf {
        self.robots_path
            .join(format!("{robot_name}.{}", defaults::ROBOT_IMAGE_EXT))
    }

    /// Wraps `cmd` in a terminal emulator titled `title`.
    ///
    /// Returns an empty string if no terminal emulator is installed.
    pub fn terminal_cmd<S: AsRef<str>>(&self, cmd: &[S], title: &str) -> String {
        self.terminal.terminal_cmd(cmd, title)
    }

    pub fn masteruri(&self) -> &str {
        &self.env.master_uri
    }

    /// Directory ROS nodes write their logs to.
    pub fn log_path(&self) -> &Path {
        &self.env.log_dir
    }

    pub fn package_dir(&self) -> &Path {
        &self.env.package_dir
    }

    pub fn help_file(&self) -> PathBuf {
        self.env.help_file()
    }

    pub fn default_cfg_path(&self) -> PathBuf {
        self.env.default_cfg_path()
    }

    /// `settings.ini` in the effective configuration directory.
    pub fn settings_file(&self) -> PathBuf {
        self.cfg_path.join(defaults::CFG_FILE)
    }

    /// The redirect file, which always lives in the default directory.
    pub fn redirect_file(&self) -> PathBuf {
        self.env.default_cfg_path().join(defaults::CFG_REDIRECT_FILE)
    }

    pub fn launch_history_file(&self) -> PathBuf {
        self.cfg_path.join(defaults::LAUNCH_HISTORY_FILE)
    }

    pub fn param_history_file(&self) -> PathBuf {
        self.cfg_path.join(defaults::PARAM_HISTORY_FILE)
    }
}

fn resolve_cfg_path(
    env: &RosEnvironment,
    stores: &dyn StoreFactory,
) -> Result<PathBuf, SettingsError> {
    let default = env.default_cfg_path();
    if !default.is_dir() {
        ensure_dir(&default)?;
        return Ok(default);
    }

    let redirect = default.join(defaults::CFG_REDIRECT_FILE);
    if !stores.exists(&redirect) {
        return Ok(default);
    }
    let target = stores
        .open(&redirect)?
        .get(SettingKey::CfgPath.as_str())
        .map(|v| v.to_ini_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    match target {
        Some(path) => {
            info!("following redirect to {}", path.display());
            ensure_dir(&path)?;
            Ok(path)
        }
        None => {
            warn!("{} has no cfg_path entry, ignoring it", redirect.display());
            Ok(default)
        }
    }
}

fn non_empty_path(key: SettingKey, path: PathBuf) -> Result<PathBuf, SettingsError> {
    if path.as_os_str().is_empty() {
        return Err(SettingsError::InvalidValue {
            key,
            value: String::new(),
        });
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), SettingsError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| SettingsError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    info!("created {}", path.display());
    Ok(())
}

fn read_length(store: &dyn PreferenceStore, key: SettingKey, default: usize) -> usize {
    match store.get(key.as_str()) {
        None => default,
        Some(value) => parse_length(key, &value).unwrap_or_else(|_| {
            warn!("{key}: {value:?} is not a length, using {default}");
            default
        }),
    }
}

fn parse_length(key: SettingKey, value: &SettingValue) -> Result<usize, SettingsError> {
    let text = value.to_ini_string();
    text.trim()
        .parse()
        .map_err(|_| SettingsError::InvalidValue { key, value: text })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
