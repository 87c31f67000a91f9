use crate::domain::error::{TermConError, TermConResult};
use crate::domain::literal::parse_c_integer;
use std::fmt;

/// Kind of the non-terminal side of the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Serial,
    RawFile,
    TcpServer,
    TcpClient,
    UnixServer,
    UnixClient,
}

impl EndpointKind {
    pub fn is_server(&self) -> bool {
        matches!(self, Self::TcpServer | Self::UnixServer)
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Serial => write!(f, "serial"),
            EndpointKind::RawFile => write!(f, "file"),
            EndpointKind::TcpServer => write!(f, "tcp-server"),
            EndpointKind::TcpClient => write!(f, "tcp-client"),
            EndpointKind::UnixServer => write!(f, "unix-server"),
            EndpointKind::UnixClient => write!(f, "unix-client"),
        }
    }
}

/// Explicit choices made on the command line. Anything left unset is
/// inferred from the address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindOverrides {
    /// `-t`/`-b`: device or file
    pub term: bool,
    /// `-s`
    pub server: bool,
    /// `-c`
    pub client: bool,
}

impl KindOverrides {
    fn socket(&self) -> bool {
        self.server || self.client
    }
}

/// How to reach the remote side. Built once, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    kind: EndpointKind,
    address: String,
    baud_rate: Option<u32>,
}

impl EndpointDescriptor {
    /// Validated constructor for an explicitly chosen kind.
    pub fn new(kind: EndpointKind, address: impl Into<String>, baud_rate: Option<u32>) -> TermConResult<Self> {
        let address = address.into();
        if address.is_empty() {
            return Err(TermConError::config("Target address is empty"));
        }
        if baud_rate.is_some() && !matches!(kind, EndpointKind::Serial | EndpointKind::RawFile) {
            return Err(TermConError::config(format!(
                "A baud rate only applies to serial devices, not {}",
                kind
            )));
        }

        let descriptor = Self {
            kind,
            address,
            baud_rate,
        };
        if matches!(kind, EndpointKind::TcpServer | EndpointKind::TcpClient) {
            descriptor.port()?;
        }
        Ok(descriptor)
    }

    /// Picks the kind from the address syntax and the overrides, then validates.
    pub fn resolve(address: &str, overrides: KindOverrides, baud_rate: Option<u32>) -> TermConResult<Self> {
        let overrides = KindOverrides {
            term: overrides.term || baud_rate.is_some(),
            ..overrides
        };
        let kind = infer_kind(address, overrides)?;
        Self::new(kind, address, baud_rate)
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Requested line speed; `None` or `Some(0)` leaves the device as it is.
    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    /// Host part of a TCP address; empty for `:port`.
    pub fn host(&self) -> &str {
        self.address
            .split_once(':')
            .map(|(host, _)| host)
            .unwrap_or_default()
    }

    /// Port part of a TCP address, read as a C integer literal.
    pub fn port(&self) -> TermConResult<u16> {
        let (_, port) = self
            .address
            .split_once(':')
            .ok_or_else(|| TermConError::config(format!("No port in \"{}\"", self.address)))?;

        parse_c_integer(port)
            .and_then(|value| u16::try_from(value).ok())
            .ok_or_else(|| TermConError::InvalidPort {
                value: port.to_string(),
            })
    }
}

/// Kind inference.
///
/// Without `-t`/`-s`/`-c`: an address with ':' is a socket unless it also
/// has '/', which makes it a device path; '/' alone is a device path and an
/// address with neither is a socket. A socket address starting with ':' or
/// without ':' is a server, anything else a client. Socket addresses with
/// ':' are TCP, the rest are UNIX socket paths.
pub fn infer_kind(address: &str, overrides: KindOverrides) -> TermConResult<EndpointKind> {
    if (overrides.socket() && overrides.term) || (overrides.server && overrides.client) {
        return Err(TermConError::config("Mutually exclusive flags are specified"));
    }

    let has_colon = address.contains(':');
    let has_slash = address.contains('/');

    let socket = if overrides.socket() {
        true
    } else if overrides.term {
        false
    } else {
        !has_slash
    };

    if !socket {
        return Ok(EndpointKind::Serial);
    }

    let server = if overrides.server {
        true
    } else if overrides.client {
        false
    } else {
        address.starts_with(':') || !has_colon
    };

    Ok(match (has_colon, server) {
        (true, true) => EndpointKind::TcpServer,
        (true, false) => EndpointKind::TcpClient,
        (false, true) => EndpointKind::UnixServer,
        (false, false) => EndpointKind::UnixClient,
    })
}
