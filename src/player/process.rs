use std::io;
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

use crate::error::ServiceError;

/// A running external player.
pub trait PlayerHandle {
    /// OS process id, used for logging.
    fn id(&self) -> u32;

    /// Non-blocking liveness check.
    fn is_alive(&mut self) -> bool;

    /// Kill the process and reap it. Calling it on a dead process is a no-op.
    fn terminate(&mut self);

    /// Freeze the process without killing it.
    fn suspend(&mut self) -> io::Result<()>;

    /// Thaw a process previously frozen with `suspend`.
    fn resume(&mut self) -> io::Result<()>;
}

/// Starts one external player per playable URL.
pub trait Launcher {
    type Handle: PlayerHandle;

    fn launch(&self, url: &str) -> Result<Self::Handle, ServiceError>;
}

/// Launches `program args... <url>` directly, without a shell.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Launcher for CommandLauncher {
    type Handle = ExternalProcess;

    fn launch(&self, url: &str) -> Result<ExternalProcess, ServiceError> {
        if url.trim().is_empty() {
            return Err(ServiceError::PlaybackLaunch(
                "track has no playable URL".to_string(),
            ));
        }

        // The player must not read from or draw on the terminal the TUI owns.
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ServiceError::PlaybackLaunch(format!("{}: {e}", self.program)))?;

        debug!("spawned {} (pid {})", self.program, child.id());
        Ok(ExternalProcess { child })
    }
}

/// A spawned player process. Dropping it kills the process.
#[derive(Debug)]
pub struct ExternalProcess {
    child: Child,
}

impl PlayerHandle for ExternalProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn terminate(&mut self) {
        if !self.is_alive() {
            return;
        }
        if let Err(e) = self.child.kill() {
            warn!("could not kill player pid {}: {e}", self.child.id());
        }
        if let Err(e) = self.child.wait() {
            warn!("could not reap player pid {}: {e}", self.child.id());
        }
    }

    fn suspend(&mut self) -> io::Result<()> {
        signal(self.child.id(), Signal::Stop)
    }

    fn resume(&mut self) -> io::Result<()> {
        signal(self.child.id(), Signal::Continue)
    }
}

impl Drop for ExternalProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

enum Signal {
    Stop,
    Continue,
}

#[cfg(unix)]
fn signal(pid: u32, sig: Signal) -> io::Result<()> {
    let sig = match sig {
        Signal::Stop => libc::SIGSTOP,
        Signal::Continue => libc::SIGCONT,
    };
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: kill(2) has no memory-safety preconditions; pid belongs to a
    // child we have not reaped yet.
    let rc = unsafe { libc::kill(pid, sig) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn signal(_pid: u32, _sig: Signal) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process suspension needs Unix signals",
    ))
}
