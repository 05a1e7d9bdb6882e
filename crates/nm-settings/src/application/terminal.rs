//! Terminal emulator lookup and command-line construction.
//!
//! The launcher probes a fixed list of emulator binaries the first time a
//! command is built and remembers the outcome, including "none found", for
//! the rest of the process.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use nm_core::domain::defaults::TERMINAL_EMULATORS;
use tracing::{debug, warn};

/// Decides whether a path names a runnable program.
#[cfg_attr(test, mockall::automock)]
pub trait ExecutableProbe {
    /// Returns `true` if `path` is a regular file the current user may execute.
    fn is_executable(&self, path: &Path) -> bool;
}

/// Probes the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl ExecutableProbe for FsProbe {
    fn is_executable(&self, path: &Path) -> bool {
        let Ok(meta) = std::fs::metadata(path) else {
            return false;
        };
        if !meta.is_file() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            meta.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }
}

/// Builds command lines that run a program inside a terminal window.
pub struct TerminalLauncher {
    candidates: Vec<PathBuf>,
    probe: Box<dyn ExecutableProbe>,
    emulator: OnceCell<Option<PathBuf>>,
}

impl TerminalLauncher {
    /// A launcher probing the default emulators on the real file system.
    pub fn new() -> Self {
        Self::with_probe(
            TERMINAL_EMULATORS.iter().map(PathBuf::from).collect(),
            Box::new(FsProbe),
        )
    }

    /// A launcher probing `candidates`, in order, with `probe`.
    pub fn with_probe(candidates: Vec<PathBuf>, probe: Box<dyn ExecutableProbe>) -> Self {
        Self {
            candidates,
            probe,
            emulator: OnceCell::new(),
        }
    }

    /// The first executable candidate, probed once and then cached.
    pub fn emulator(&self) -> Option<&Path> {
        self.emulator
            .get_or_init(|| {
                let found = self
                    .candidates
                    .iter()
                    .find(|c| self.probe.is_executable(c))
                    .cloned();
                match &found {
                    Some(path) => debug!("using terminal emulator {}", path.display()),
                    None => warn!("no terminal emulator found in {:?}", self.candidates),
                }
                found
            })
            .as_deref()
    }

    /// Returns `"<emulator> -T <title> -e <cmd...>"`, or an empty string when
    /// no terminal emulator is installed.
    pub fn terminal_cmd<S: AsRef<str>>(&self, cmd: &[S], title: &str) -> String {
        let Some(emulator) = self.emulator() else {
            return String::new();
        };
        let args: Vec<&str> = cmd.iter().map(AsRef::as_ref).collect();
        format!("{} -T {} -e {}", emulator.display(), title, args.join(" "))
    }
}

impl Default for TerminalLauncher {
    fn default() -> Self {
        Self::new()
    }
}
