use crate::core::connector::{BoxedStream, Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use crate::infrastructure::fd::FdStream;
use crate::infrastructure::serial::{line::apply_baud, raw::open_plain};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use tracing::{info, warn};

/// Opens a serial device, falling back to a plain file when the path is
/// not a terminal (handy for replaying or capturing traffic).
pub struct SerialConnector {
    path: String,
    baud_rate: u32,
}

impl SerialConnector {
    /// `baud_rate == 0` keeps the device's current speed.
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
        }
    }

    fn open(&self) -> TermConResult<File> {
        let device = open_terminal(&self.path)?;
        if self.baud_rate == 0 {
            return Ok(device);
        }
        apply_baud(device, self.baud_rate)
    }
}

#[async_trait]
impl Connector for SerialConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::Serial
    }

    async fn connect(&self) -> TermConResult<Connection> {
        let file = match self.open() {
            Ok(file) => {
                info!("Serial device {} opened", self.path);
                file
            }
            Err(TermConError::NotATerminal { path }) => {
                if self.baud_rate != 0 {
                    warn!("{} is not a terminal, ignoring baud rate {}", path, self.baud_rate);
                }
                info!("{} is not a terminal, opening it as a plain file", path);
                open_plain(&path)?
            }
            Err(e) => return Err(e),
        };

        let stream: BoxedStream = Box::new(
            FdStream::new(file).map_err(TermConError::setup("poll", self.path.as_str()))?,
        );
        Ok(Connection::new(stream, self.path.clone()))
    }
}

/// Blocking, non-exclusive read/write open that insists on a terminal.
fn open_terminal(path: &str) -> TermConResult<File> {
    let device = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(TermConError::setup("open tty", path))?;

    if !device.is_terminal() {
        return Err(TermConError::NotATerminal {
            path: path.to_string(),
        });
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_regular_file_falls_back_to_plain_open() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"recorded output").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let connector = SerialConnector::new(path.clone(), 0);
        let mut connection = connector.connect().await.unwrap();
        assert_eq!(connection.label, path);
        assert!(connection.peer.is_none());

        let mut buf = [0u8; 64];
        let n = connection.stream.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"recorded output");
    }

    #[tokio::test]
    async fn test_baud_rate_ignored_for_plain_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let mut connection = SerialConnector::new(path.clone(), 115200).connect().await.unwrap();
        connection.stream.write_all(b"AT\r").await.unwrap();
        connection.stream.flush().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"AT\r");
    }

    #[tokio::test]
    async fn test_missing_device_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttyUSB9");

        let err = SerialConnector::new(path.to_string_lossy(), 0)
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, TermConError::Setup { operation: "open tty", .. }));
        assert!(err.to_string().starts_with("open tty "));
    }

    #[tokio::test]
    async fn test_terminal_device_is_relayed_both_ways() {
        use nix::pty::openpty;
        use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
        use std::time::Duration;

        let pair = openpty(None, None).unwrap();
        // SAFETY: openpty hands over two fresh descriptors that nothing else owns.
        let (master, slave) = unsafe { (OwnedFd::from_raw_fd(pair.master), OwnedFd::from_raw_fd(pair.slave)) };
        let path = std::fs::read_link(format!("/proc/self/fd/{}", slave.as_raw_fd()))
            .unwrap()
            .to_string_lossy()
            .to_string();

        let mut connection = SerialConnector::new(path.clone(), 0).connect().await.unwrap();
        assert_eq!(connection.label, path);

        let mut line = File::from(master);
        line.write_all(b"OK\n").unwrap();
        let mut buf = [0u8; 16];
        let n = tokio::time::timeout(Duration::from_secs(2), connection.stream.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..n], b"OK\n");

        connection.stream.write_all(b"x").await.unwrap();
    }

    #[test]
    fn test_open_terminal_reports_not_a_terminal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = open_terminal(&file.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, TermConError::NotATerminal { .. }));
    }
}
