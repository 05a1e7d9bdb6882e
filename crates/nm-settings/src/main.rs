//! Node manager settings: command-line front end.
//!
//! Inspects and edits the same `settings.ini` the node manager GUI uses.
//!
//! # Usage
//!
//! ```text
//! nm-settings [--ros-home <DIR>] <COMMAND>
//!
//! Commands:
//!   show      Print every setting            [--format text|toml]
//!   get       Print one setting              <KEY>
//!   set       Set and persist one setting    <KEY> <VALUE>
//!   terminal  Print a terminal command line  [--title T] -- <CMD>...
//! ```
//!
//! # Environment variables
//!
//! | Variable           | Default                   | Description                    |
//! |--------------------|---------------------------|--------------------------------|
//! | `ROS_HOME`         | `~/.ros`                  | Parent of `node_manager/`      |
//! | `ROS_LOG_DIR`      | `~/.ros/log`              | Log directory                  |
//! | `ROS_MASTER_URI`   | `http://localhost:11311/` | Master URI                     |
//! | `ROS_PACKAGE_PATH` |                           | Searched for `node_manager_fkie` |
//! | `RUST_LOG`         | `info`                    | Log filter                     |

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use nm_core::{SettingKey, SettingValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nm_settings::{IniStoreFactory, RosEnvironment, Settings};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "nm-settings",
    about = "Inspect and edit the node manager preferences",
    version
)]
struct Cli {
    /// ROS home directory; the configuration lives in `<DIR>/node_manager`.
    #[arg(long, global = true, env = "ROS_HOME")]
    ros_home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every setting.
    Show {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print one setting.
    Get { key: SettingKey },
    /// Set one setting and write it to disk.
    ///
    /// Process-local settings (current_dialog_path, log_viewer,
    /// start_remote_script, respawn_script) are rejected since they would be
    /// lost when this process exits.
    Set { key: SettingKey, value: String },
    /// Print the command line that runs CMD in a terminal window.
    Terminal {
        #[arg(long, short = 'T', default_value = "")]
        title: String,
        #[arg(trailing_var_arg = true, required = true)]
        cmd: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Toml,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so that stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut env = RosEnvironment::from_env();
    if let Some(ros_home) = cli.ros_home {
        env = env.with_ros_home(ros_home);
    }
    debug!("resolved environment: {env:?}");

    let mut settings = Settings::open(env, Box::new(IniStoreFactory::new()))
        .context("failed to load node manager settings")?;

    match cli.command {
        Command::Show { format } => match format {
            Format::Text => {
                for key in SettingKey::ALL {
                    println!("{key} = {}", settings.value(key));
                }
                println!("masteruri = {}", settings.masteruri());
                println!("log_path = {}", settings.log_path().display());
            }
            Format::Toml => {
                let text = toml::to_string_pretty(&settings.snapshot())
                    .context("failed to render settings as TOML")?;
                print!("{text}");
            }
        },
        Command::Get { key } => println!("{}", settings.value(key)),
        Command::Set { key, value } => {
            anyhow::ensure!(key.is_persisted(), "{key} is process-local and cannot be set here");
            settings
                .set_value(key, SettingValue::from(value))
                .with_context(|| format!("failed to set {key}"))?;
            println!("{key} = {}", settings.value(key));
        }
        Command::Terminal { title, cmd } => {
            let line = settings.terminal_cmd(cmd.as_slice(), &title);
            anyhow::ensure!(!line.is_empty(), "no terminal emulator found");
            println!("{line}");
        }
    }
    Ok(())
}
