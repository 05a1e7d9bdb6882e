//! Integration tests for settings persistence on a real file system.
//!
//! Each test builds a `RosEnvironment` rooted in a fresh temporary home
//! directory and uses the INI-backed store, so every write lands in an actual
//! `settings.ini` or `redirect` file.

use std::path::Path;

use nm_settings::{IniStoreFactory, RosEnvironment, Settings, TerminalLauncher};

fn open(env: &RosEnvironment) -> Settings {
    Settings::open(env.clone(), Box::new(IniStoreFactory::new())).expect("settings must open")
}

#[test]
fn test_default_user_survives_a_fresh_instance() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let mut settings = open(&env);

    // Act
    settings.set_default_user("alice").unwrap();
    drop(settings);
    let reopened = open(&env);

    // Assert
    assert_eq!(reopened.default_user(), "alice");
}

#[test]
fn test_settings_file_is_plain_ini() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let mut settings = open(&env);

    settings.set_param_history_length(20).unwrap();
    settings.set_store_geometry(false).unwrap();

    let content = std::fs::read_to_string(settings.settings_file()).unwrap();
    assert!(content.contains("param_history_length=20"), "{content}");
    assert!(content.contains("store_geometry=false"), "{content}");
}

#[test]
fn test_existing_qt_settings_file_is_read() {
    // Arrange: a settings.ini as written by the Qt based node manager
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    std::fs::create_dir_all(env.default_cfg_path()).unwrap();
    std::fs::write(
        env.default_cfg_path().join("settings.ini"),
        "[General]\n\
         default_user=operator\n\
         launch_history_length=7\n\
         launch_view_file_ext=.launch, .yaml\n\
         store_geometry=false\n",
    )
    .unwrap();

    // Act
    let settings = open(&env);

    // Assert
    assert_eq!(settings.default_user(), "operator");
    assert_eq!(settings.launch_history_length(), 7);
    assert_eq!(settings.launch_view_file_ext(), [".launch", ".yaml"]);
    assert!(!settings.store_geometry());
    assert_eq!(settings.param_history_length(), 12);
}

#[test]
fn test_redirect_is_honoured_by_the_next_instance() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let target = home.path().join("relocated");
    let mut settings = open(&env);

    // Act
    settings.set_cfg_path(&target).unwrap();
    settings.set_default_user("bob").unwrap();
    drop(settings);
    let reopened = open(&env);

    // Assert
    assert_eq!(reopened.cfg_path(), target);
    assert_eq!(reopened.default_user(), "bob");
    assert!(target.join("settings.ini").is_file());
    assert!(
        !env.default_cfg_path().join("settings.ini").exists(),
        "writes after relocation must go to the new directory"
    );
}

#[test]
fn test_resetting_cfg_path_removes_redirect_file() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let redirect = env.default_cfg_path().join("redirect");
    let mut settings = open(&env);

    settings.set_cfg_path(home.path().join("relocated")).unwrap();
    assert!(redirect.is_file());
    settings.set_cfg_path(env.default_cfg_path()).unwrap();

    assert!(!redirect.exists());
    assert_eq!(open(&env).cfg_path(), env.default_cfg_path());
}

#[test]
fn test_extension_lists_do_not_overwrite_each_other() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let mut settings = open(&env);

    settings.set_launch_view_file_ext("['.launch', '.test']").unwrap();
    settings.set_follow_include_file_ext(vec![".xml"]).unwrap();
    drop(settings);
    let reopened = open(&env);

    assert_eq!(reopened.launch_view_file_ext(), [".launch", ".test"]);
    assert_eq!(reopened.follow_include_file_ext(), [".xml"]);
}

#[test]
fn test_robot_image_follows_persisted_robots_path() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let robots = home.path().join("robot_images");
    let mut settings = open(&env);

    settings.set_robots_path(&robots).unwrap();
    drop(settings);
    let reopened = open(&env);

    assert_eq!(reopened.robot_image_file("bot1"), robots.join("bot1.png"));
}

#[test]
fn test_unreadable_settings_file_is_a_parse_error() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    std::fs::create_dir_all(env.default_cfg_path()).unwrap();
    std::fs::write(env.default_cfg_path().join("settings.ini"), "[General\nx=1\n").unwrap();

    let result = Settings::open(env, Box::new(IniStoreFactory::new()));

    assert!(matches!(
        result,
        Err(nm_settings::SettingsError::Store(nm_settings::StoreError::Parse { .. }))
    ));
}

#[test]
fn test_terminal_cmd_is_empty_when_no_candidate_exists() {
    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let launcher = TerminalLauncher::with_probe(
        vec![home.path().join("no-such-terminal")],
        Box::new(nm_settings::FsProbe),
    );
    let settings = open(&env).with_terminal(launcher);

    assert_eq!(settings.terminal_cmd(&["echo", "hi"], "T"), "");
}

#[cfg(unix)]
#[test]
fn test_terminal_cmd_uses_installed_emulator() {
    use std::os::unix::fs::PermissionsExt;

    let home = tempfile::tempdir().unwrap();
    let env = RosEnvironment::with_home(home.path());
    let term = home.path().join("xterm");
    std::fs::write(&term, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&term, std::fs::Permissions::from_mode(0o755)).unwrap();
    let launcher = TerminalLauncher::with_probe(
        vec![home.path().join("missing"), term.clone()],
        Box::new(nm_settings::FsProbe),
    );
    let settings = open(&env).with_terminal(launcher);

    let cmd = settings.terminal_cmd(&["echo", "hi"], "T");

    assert_eq!(cmd, format!("{} -T T -e echo hi", term.display()));
    assert!(Path::new(&term).is_file());
}
