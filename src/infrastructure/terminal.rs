// Terminal module - the configured terminal as the local side of the relay
use crate::core::connector::Connection;
use crate::domain::error::{TermConError, TermConResult};
use crate::infrastructure::fd::FdStream;
use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use tracing::debug;

/// Puts the local terminal into raw mode and gives it back afterwards.
pub trait RawModeController: Send {
    fn enter_raw(&mut self) -> TermConResult<()>;

    /// Restores the saved settings. Calling it when raw mode is not active
    /// does nothing.
    fn restore(&mut self) -> TermConResult<()>;
}

/// Raw mode applied to one terminal descriptor through termios
#[derive(Debug)]
pub struct TermiosRawMode {
    device: File,
    path: String,
    saved: Option<Termios>,
}

impl RawModeController for TermiosRawMode {
    fn enter_raw(&mut self) -> TermConResult<()> {
        if self.saved.is_some() {
            return Ok(());
        }
        let fd = self.device.as_raw_fd();
        let saved = tcgetattr(fd).map_err(|e| {
            TermConError::Terminal(format!("Failed to read settings of {}: {}", self.path, e))
        })?;

        let mut raw = saved.clone();
        cfmakeraw(&mut raw);
        tcsetattr(fd, SetArg::TCSANOW, &raw).map_err(|e| {
            TermConError::Terminal(format!("Failed to enter raw mode on {}: {}", self.path, e))
        })?;

        self.saved = Some(saved);
        debug!("{} switched to raw mode", self.path);
        Ok(())
    }

    fn restore(&mut self) -> TermConResult<()> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        tcsetattr(self.device.as_raw_fd(), SetArg::TCSANOW, &saved).map_err(|e| {
            TermConError::Terminal(format!("Failed to restore {}: {}", self.path, e))
        })?;
        debug!("{} settings restored", self.path);
        Ok(())
    }
}

/// The opened local terminal, before it is handed to a session
#[derive(Debug)]
pub struct LocalTerminal {
    device: File,
    path: String,
}

impl LocalTerminal {
    /// Opens the terminal device for reading and writing.
    pub fn open(path: &str) -> TermConResult<Self> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(TermConError::setup("open", path))?;

        Ok(Self {
            device,
            path: path.to_string(),
        })
    }

    /// Raw-mode controller bound to this same device.
    pub fn raw_mode(&self) -> TermConResult<TermiosRawMode> {
        let device = self
            .device
            .try_clone()
            .map_err(TermConError::setup("dup", self.path.as_str()))?;
        Ok(TermiosRawMode {
            device,
            path: self.path.clone(),
            saved: None,
        })
    }

    /// Local side of the session, labelled with the device path.
    pub fn into_connection(self) -> TermConResult<Connection<FdStream>> {
        let stream = FdStream::new(self.device).map_err(TermConError::setup("poll", self.path.as_str()))?;
        Ok(Connection::new(stream, self.path))
    }
}
