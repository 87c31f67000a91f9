use crate::core::connector::{BoxedStream, Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, info};

/// Accepts exactly one TCP client on the wildcard address
pub struct TcpServerConnector {
    port: u16,
}

impl TcpServerConnector {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Binds `0.0.0.0:<port>` with SO_REUSEADDR and a backlog of one.
    pub fn bind(&self) -> TermConResult<SingleAcceptor> {
        let target = format!(":{}", self.port);
        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port));

        let socket = TcpSocket::new_v4().map_err(TermConError::setup("socket", target.as_str()))?;
        socket
            .set_reuseaddr(true)
            .map_err(TermConError::setup("setsockopt (SO_REUSEADDR)", target.as_str()))?;
        socket
            .bind(bind_addr)
            .map_err(TermConError::setup("bind", target.as_str()))?;
        let listener = socket
            .listen(1)
            .map_err(TermConError::setup("listen", target.as_str()))?;

        let local_addr = listener
            .local_addr()
            .map_err(TermConError::setup("getsockname", target.as_str()))?;
        info!("Listening on {}", local_addr);

        Ok(SingleAcceptor {
            listener,
            port: self.port,
            local_addr,
        })
    }
}

#[async_trait]
impl Connector for TcpServerConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::TcpServer
    }

    async fn connect(&self) -> TermConResult<Connection> {
        self.bind()?.accept_one().await
    }
}

/// A bound listener that will hand out a single connection
pub struct SingleAcceptor {
    listener: TcpListener,
    port: u16,
    local_addr: SocketAddr,
}

impl SingleAcceptor {
    /// Address actually bound (useful when port 0 was requested)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits for one client, then closes the listener for good.
    pub async fn accept_one(self) -> TermConResult<Connection> {
        let label = format!("server :{}", self.port);
        let (stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(TermConError::setup("accept", label.as_str()))?;
        drop(self.listener);
        debug!("Listener on {} closed", self.local_addr);

        debug!("Accepted {}", peer);
        let stream: BoxedStream = Box::new(stream);
        Ok(Connection::new(stream, label).with_peer(peer.to_string()))
    }
}
