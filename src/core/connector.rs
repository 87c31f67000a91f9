use crate::domain::endpoint::{EndpointDescriptor, EndpointKind};
use crate::domain::error::TermConResult;
use crate::infrastructure::serial::{RawFileConnector, SerialConnector};
use crate::infrastructure::tcp::{TcpClientConnector, TcpServerConnector};
use crate::infrastructure::unix::{UnixClientConnector, UnixServerConnector};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Any bidirectional byte stream the relay can drive
pub trait ByteStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ByteStream for T {}

pub type BoxedStream = Box<dyn ByteStream>;

/// An open stream plus the name used for it in diagnostics
pub struct Connection<S = BoxedStream> {
    pub stream: S,
    pub label: String,
    /// Peer that was accepted, for server kinds
    pub peer: Option<String>,
}

impl<S> Connection<S> {
    pub fn new(stream: S, label: impl Into<String>) -> Self {
        Self {
            stream,
            label: label.into(),
            peer: None,
        }
    }

    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }
}

impl<S> std::fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("label", &self.label)
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

/// One setup strategy per endpoint kind
#[async_trait]
pub trait Connector: Send + Sync {
    /// Kind this connector establishes
    fn kind(&self) -> EndpointKind;

    /// Open the stream. Every failure is final, there is no retry.
    async fn connect(&self) -> TermConResult<Connection>;
}

/// Picks the setup strategy for a descriptor.
pub fn connector_for(descriptor: &EndpointDescriptor) -> TermConResult<Box<dyn Connector>> {
    let address = descriptor.address().to_string();

    Ok(match descriptor.kind() {
        EndpointKind::Serial => Box::new(SerialConnector::new(
            address,
            descriptor.baud_rate().unwrap_or(0),
        )),
        EndpointKind::RawFile => Box::new(RawFileConnector::new(address)),
        EndpointKind::TcpServer => Box::new(TcpServerConnector::new(descriptor.port()?)),
        EndpointKind::TcpClient => Box::new(TcpClientConnector::new(
            descriptor.host(),
            descriptor.port()?,
        )),
        EndpointKind::UnixServer => Box::new(UnixServerConnector::new(address)),
        EndpointKind::UnixClient => Box::new(UnixClientConnector::new(address)),
    })
}

/// Establish the remote side described by `descriptor`.
pub async fn connect(descriptor: &EndpointDescriptor) -> TermConResult<Connection> {
    let connector = connector_for(descriptor)?;
    debug!("Connecting {} endpoint {}", connector.kind(), descriptor.address());
    connector.connect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::endpoint::KindOverrides;
    use crate::domain::error::TermConError;

    #[test]
    fn test_connector_matches_kind() {
        let cases = [
            ("/dev/ttyS0", EndpointKind::Serial),
            (":9000", EndpointKind::TcpServer),
            ("localhost:9000", EndpointKind::TcpClient),
            ("sock", EndpointKind::UnixServer),
        ];
        for (address, kind) in cases {
            let descriptor = EndpointDescriptor::resolve(address, KindOverrides::default(), None).unwrap();
            assert_eq!(connector_for(&descriptor).unwrap().kind(), kind);
        }

        let raw = EndpointDescriptor::new(EndpointKind::RawFile, "/tmp/capture.log", None).unwrap();
        assert_eq!(connector_for(&raw).unwrap().kind(), EndpointKind::RawFile);
    }

    #[tokio::test]
    async fn test_unix_client_to_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nobody-listens.sock");
        let descriptor = EndpointDescriptor::new(
            EndpointKind::UnixClient,
            path.to_string_lossy(),
            None,
        )
        .unwrap();

        let err = connect(&descriptor).await.unwrap_err();
        assert!(matches!(err, TermConError::Setup { operation: "connect", .. }));
    }
}
