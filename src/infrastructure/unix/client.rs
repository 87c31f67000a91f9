use crate::core::connector::{Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::net::UnixStream;
use tracing::info;

/// Connects to a filesystem socket path
pub struct UnixClientConnector {
    path: PathBuf,
}

impl UnixClientConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Connector for UnixClientConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::UnixClient
    }

    async fn connect(&self) -> TermConResult<Connection> {
        let label = self.path.display().to_string();
        let stream = UnixStream::connect(&self.path)
            .await
            .map_err(TermConError::setup("connect", label.as_str()))?;

        info!("Connected to {}", label);
        Ok(Connection::new(Box::new(stream), label))
    }
}
