use crate::core::connector::{Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info, warn};

/// Connects to `host:port`
pub struct TcpClientConnector {
    host: String,
    port: u16,
}

impl TcpClientConnector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl Connector for TcpClientConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::TcpClient
    }

    async fn connect(&self) -> TermConResult<Connection> {
        let resolve_error = |message: String| TermConError::Resolve {
            host: self.host.clone(),
            message,
        };

        let addr = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| resolve_error(e.to_string()))?
            .next()
            .ok_or_else(|| resolve_error("no address found".to_string()))?;
        debug!("{} resolved to {}", self.host, addr);

        let stream = TcpStream::connect(addr)
            .await
            .map_err(TermConError::setup("connect", self.label()))?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        info!("TCP connection established to {}", addr);
        Ok(Connection::new(Box::new(stream), self.label()))
    }
}
