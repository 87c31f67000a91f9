use crate::core::connector::{BoxedStream, Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use async_trait::async_trait;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use tokio::net::{UnixListener, UnixSocket};
use tracing::{debug, info};

/// Accepts exactly one client on a filesystem socket path
pub struct UnixServerConnector {
    path: PathBuf,
}

impl UnixServerConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Binds the socket path with a backlog of one.
    pub fn bind(&self) -> TermConResult<UnixSingleAcceptor> {
        let target = self.path.display().to_string();

        remove_stale_socket(&self.path)?;

        let socket = UnixSocket::new_stream().map_err(TermConError::setup("socket (AF_UNIX)", target.as_str()))?;
        socket
            .bind(&self.path)
            .map_err(TermConError::setup("bind", target.as_str()))?;
        let listener = socket
            .listen(1)
            .map_err(TermConError::setup("listen", target.as_str()))?;
        info!("Listening on {}", target);

        Ok(UnixSingleAcceptor {
            listener,
            path: self.path.clone(),
        })
    }
}

/// A socket file left behind by an earlier server is removed; any other kind
/// of file at the path is left alone and makes the bind fail.
fn remove_stale_socket(path: &Path) -> TermConResult<()> {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return Ok(());
    };
    if metadata.file_type().is_socket() {
        std::fs::remove_file(path).map_err(TermConError::setup("unlink", path.display().to_string()))?;
        debug!("Removed stale socket {}", path.display());
    }
    Ok(())
}

#[async_trait]
impl Connector for UnixServerConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::UnixServer
    }

    async fn connect(&self) -> TermConResult<Connection> {
        self.bind()?.accept_one().await
    }
}

/// A bound UNIX listener that will hand out a single connection
pub struct UnixSingleAcceptor {
    listener: UnixListener,
    path: PathBuf,
}

impl UnixSingleAcceptor {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for one client, then stops listening. The socket file is left
    /// in place.
    pub async fn accept_one(self) -> TermConResult<Connection> {
        let label = format!("server {}", self.path.display());
        let (stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(TermConError::setup("accept", label.as_str()))?;
        drop(self.listener);
        debug!("Listener on {} closed", self.path.display());

        let peer = peer
            .as_pathname()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unnamed socket".to_string());
        debug!("Accepted {}", peer);

        let stream: BoxedStream = Box::new(stream);
        Ok(Connection::new(stream, label).with_peer(peer))
    }
}
