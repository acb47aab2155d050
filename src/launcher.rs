use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Open,
    RunElevated,
    Explore,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Open => "open",
            Verb::RunElevated => "runas",
            Verb::Explore => "explore",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: PathBuf,
    /// Selected paths, byte-exact.
    pub arguments: Vec<OsString>,
    pub verb: Verb,
}

impl LaunchRequest {
    /// Arguments as one string: every argument double-quoted with a leading space.
    /// Lossy; only for display and the PowerShell elevation script.
    pub fn command_line(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| format!(" \"{}\"", arg.to_string_lossy()))
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program} ({verb}): {source}")]
    Spawn {
        program: String,
        verb: Verb,
        #[source]
        source: io::Error,
    },
}

/// Starts external programs. Fire-and-forget: nothing waits for the child.
pub trait Launcher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError>;
}

/// Launches through the operating system.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    /// Program that opens a folder for browsing. Off Windows it also opens
    /// handlers that are not executable themselves (desktop entries, documents).
    pub file_manager: String,
    /// Program used to elevate a handler.
    pub elevate_with: String,
}

impl SystemLauncher {
    pub fn default_file_manager() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }

    pub fn default_elevate_with() -> &'static str {
        if cfg!(target_os = "windows") {
            "powershell"
        } else {
            "sudo"
        }
    }

    fn command_for(&self, request: &LaunchRequest) -> Command {
        match request.verb {
            Verb::Explore => {
                let mut cmd = Command::new(&self.file_manager);
                cmd.arg(&request.program);
                cmd
            }
            Verb::Open => self.open_command(request),
            Verb::RunElevated => self.elevated_command(request),
        }
    }

    // `start` resolves shortcuts and file associations like the shell does.
    #[cfg(windows)]
    fn open_command(&self, request: &LaunchRequest) -> Command {
        use std::os::windows::process::CommandExt;
        let mut line = OsString::from("/C start \"\" \"");
        line.push(request.program.as_os_str());
        line.push("\"");
        let arguments = raw_command_line(request);
        if !arguments.is_empty() {
            line.push(" ");
            line.push(arguments);
        }
        let mut cmd = Command::new("cmd");
        cmd.raw_arg(line);
        cmd
    }

    #[cfg(not(windows))]
    fn open_command(&self, request: &LaunchRequest) -> Command {
        let mut cmd = if needs_opener(&request.program) {
            let mut cmd = Command::new(&self.file_manager);
            cmd.arg(&request.program);
            cmd
        } else {
            Command::new(&request.program)
        };
        append_arguments(&mut cmd, request);
        cmd
    }

    #[cfg(windows)]
    fn elevated_command(&self, request: &LaunchRequest) -> Command {
        let quote = |s: &str| format!("'{}'", s.replace('\'', "''"));
        let mut script = format!(
            "Start-Process -FilePath {} -Verb RunAs",
            quote(&request.program.to_string_lossy())
        );
        if !request.arguments.is_empty() {
            script.push_str(&format!(
                " -ArgumentList {}",
                quote(request.command_line().trim_start())
            ));
        }
        let mut cmd = Command::new(&self.elevate_with);
        cmd.args(["-NoProfile", "-Command", &script]);
        cmd
    }

    #[cfg(not(windows))]
    fn elevated_command(&self, request: &LaunchRequest) -> Command {
        let mut cmd = Command::new(&self.elevate_with);
        cmd.arg(&request.program);
        append_arguments(&mut cmd, request);
        cmd
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        SystemLauncher {
            file_manager: Self::default_file_manager().to_string(),
            elevate_with: Self::default_elevate_with().to_string(),
        }
    }
}

/// A plain file without an execute bit cannot be spawned directly. Missing
/// programs are spawned anyway so the failure names the handler.
#[cfg(not(windows))]
fn needs_opener(program: &std::path::Path) -> bool {
    std::fs::metadata(program)
        .is_ok_and(|meta| meta.is_file() && !crate::utils::is_executable(&meta))
}

/// Every argument double-quoted, space separated, without lossy conversion.
#[cfg(windows)]
fn raw_command_line(request: &LaunchRequest) -> OsString {
    let mut line = OsString::new();
    for (idx, arg) in request.arguments.iter().enumerate() {
        if idx > 0 {
            line.push(" ");
        }
        line.push("\"");
        line.push(arg);
        line.push("\"");
    }
    line
}

#[cfg(not(windows))]
fn append_arguments(cmd: &mut Command, request: &LaunchRequest) {
    cmd.args(&request.arguments);
}

impl Launcher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError> {
        let mut cmd = self.command_for(request);
        // The elevation helper may need to prompt on the terminal.
        if request.verb != Verb::RunElevated {
            cmd.stdin(Stdio::null());
        }
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        tracing::info!(program = %request.program.display(), verb = %request.verb, "Launching");
        cmd.spawn().map(drop).map_err(|source| LaunchError::Spawn {
            program: request.program.display().to_string(),
            verb: request.verb,
            source,
        })
    }
}
