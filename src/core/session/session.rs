use crate::core::connector::Connection;
use crate::domain::escape::EscapeKey;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Per-session switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Write local input back to the local terminal
    pub echo: bool,
    /// Ends the session when read on its own from the local side
    pub escape_key: EscapeKey,
}

/// Both open streams of one relay run.
///
/// Owns the handles exclusively; they are closed when the session is dropped.
pub struct Session<R, L> {
    pub(crate) remote: R,
    pub(crate) remote_label: String,
    pub(crate) local: L,
    pub(crate) local_label: String,
    pub(crate) options: SessionOptions,
}

impl<R, L> Session<R, L>
where
    R: AsyncRead + AsyncWrite + Unpin,
    L: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(remote: Connection<R>, local: Connection<L>, options: SessionOptions) -> Self {
        debug!(
            "Session {} <-> {} (echo: {}, quit key: {})",
            remote.label, local.label, options.echo, options.escape_key
        );
        Self {
            remote: remote.stream,
            remote_label: remote.label,
            local: local.stream,
            local_label: local.label,
            options,
        }
    }
}

impl<R, L> Drop for Session<R, L> {
    fn drop(&mut self) {
        debug!("Session {} closed", self.remote_label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keeps_labels_and_options() {
        let (remote, _remote_peer) = tokio::io::duplex(64);
        let (local, _local_peer) = tokio::io::duplex(64);
        let options = SessionOptions {
            echo: true,
            escape_key: EscapeKey::new(0x1d),
        };

        let session = Session::new(
            Connection::new(remote, "server :9000"),
            Connection::new(local, "/dev/tty"),
            options,
        );
        assert_eq!(session.remote_label, "server :9000");
        assert_eq!(session.local_label, "/dev/tty");
        assert_eq!(session.options, options);
    }

    #[test]
    fn test_default_options() {
        let options = SessionOptions::default();
        assert!(!options.echo);
        assert_eq!(options.escape_key.byte(), 0x01);
    }
}
