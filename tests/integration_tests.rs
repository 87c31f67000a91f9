use std::time::Duration;
use termcon::infrastructure::tcp::TcpServerConnector;
use termcon::infrastructure::unix::UnixServerConnector;
use termcon::{
    connect, Connection, EndpointDescriptor, EndpointKind, EscapeKey, KindOverrides, RelayLoop,
    Session, SessionOptions, TermConConfig, TermConError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UnixStream};
use tokio::time::timeout;

/// Integration tests for the TermCon library
#[cfg(test)]
mod integration_tests {
    use super::*;

    async fn read_exact_within(stream: &mut (impl AsyncReadExt + Unpin), len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        timeout(Duration::from_secs(5), stream.read_exact(&mut buf))
            .await
            .expect("timed out")
            .expect("read failed");
        buf
    }

    #[tokio::test]
    async fn test_tcp_server_session_ends_on_quit_key() {
        let acceptor = TcpServerConnector::new(0).bind().expect("bind");
        let port = acceptor.local_addr().port();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
            stream.write_all(b"ping").await.unwrap();
            stream
        });

        let remote = acceptor.accept_one().await.expect("accept");
        assert!(remote.peer.as_deref().unwrap_or_default().starts_with("127.0.0.1:"));
        let _client = client.await.unwrap();

        let (local, mut terminal) = tokio::io::duplex(4096);
        let session = Session::new(
            remote,
            Connection::new(local, "/dev/tty"),
            SessionOptions::default(),
        );
        let relay = tokio::spawn(RelayLoop::new(session).run(std::future::pending()));

        assert_eq!(read_exact_within(&mut terminal, 4).await, b"ping");
        terminal.write_all(&[0x01]).await.unwrap();

        let result = timeout(Duration::from_secs(5), relay).await.expect("relay hung");
        assert!(result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_tcp_client_session_relays_both_ways() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());

        let descriptor = EndpointDescriptor::resolve(&address, KindOverrides::default(), None).unwrap();
        assert_eq!(descriptor.kind(), EndpointKind::TcpClient);

        let (remote, accepted) = tokio::join!(connect(&descriptor), listener.accept());
        let remote = remote.unwrap();
        let (mut peer, _) = accepted.unwrap();
        assert_eq!(remote.label, address);

        let (local, mut terminal) = tokio::io::duplex(4096);
        let options = SessionOptions {
            echo: true,
            escape_key: EscapeKey::parse("ctrl-]").unwrap(),
        };
        let session = Session::new(remote, Connection::new(local, "/dev/tty"), options);
        let relay = tokio::spawn(RelayLoop::new(session).run(std::future::pending()));

        terminal.write_all(b"help\r").await.unwrap();
        assert_eq!(read_exact_within(&mut terminal, 5).await, b"help\r");
        assert_eq!(read_exact_within(&mut peer, 5).await, b"help\r");

        peer.write_all(b"ok\r\n").await.unwrap();
        assert_eq!(read_exact_within(&mut terminal, 4).await, b"ok\r\n");

        // The peer hanging up ends the session with an error naming it
        drop(peer);
        let err = timeout(Duration::from_secs(5), relay)
            .await
            .expect("relay hung")
            .unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), format!("\"{}\" EOF", address));
    }

    #[tokio::test]
    async fn test_unix_server_accepts_one_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("termcon.sock");

        let acceptor = UnixServerConnector::new(path.clone()).bind().expect("bind");
        let client = tokio::spawn({
            let path = path.clone();
            async move { UnixStream::connect(path).await.unwrap() }
        });

        let remote = acceptor.accept_one().await.expect("accept");
        assert_eq!(remote.label, format!("server {}", path.display()));
        assert!(remote.peer.is_some());
        drop(client.await.unwrap());
    }

    #[tokio::test]
    async fn test_unix_client_to_missing_path_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");
        let overrides = KindOverrides {
            client: true,
            ..KindOverrides::default()
        };

        let descriptor =
            EndpointDescriptor::resolve(&path.to_string_lossy(), overrides, None).unwrap();
        assert_eq!(descriptor.kind(), EndpointKind::UnixClient);

        let err = connect(&descriptor).await.unwrap_err();
        assert!(matches!(err, TermConError::Setup { operation: "connect", .. }));
        assert!(err.to_string().starts_with("connect "));
    }

    #[test]
    fn test_config_round_trip() {
        let config = TermConConfig::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize config");
        let deserialized: TermConConfig = toml::from_str(&toml_str).expect("Failed to deserialize config");

        assert_eq!(config.global.quit_key, deserialized.global.quit_key);
        assert_eq!(config.global.local_device, deserialized.global.local_device);
    }

    #[test]
    fn test_error_display() {
        let error = TermConError::Config {
            message: "Invalid configuration".to_string(),
        };
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("Invalid configuration"));

        let error = TermConError::InvalidPort {
            value: "80x".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid port value: \"80x\"");
    }
}
