use crate::core::connector::{BoxedStream, Connection, Connector};
use crate::domain::endpoint::EndpointKind;
use crate::domain::error::{TermConError, TermConResult};
use crate::infrastructure::fd::FdStream;
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use tracing::info;

/// Plain read/write file used as the remote side
pub struct RawFileConnector {
    path: String,
}

impl RawFileConnector {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Connector for RawFileConnector {
    fn kind(&self) -> EndpointKind {
        EndpointKind::RawFile
    }

    async fn connect(&self) -> TermConResult<Connection> {
        let file = open_plain(&self.path)?;
        info!("File {} opened", self.path);
        let stream: BoxedStream = Box::new(
            FdStream::new(file).map_err(TermConError::setup("poll", self.path.as_str()))?,
        );
        Ok(Connection::new(stream, self.path.clone()))
    }
}

/// Opens an existing file for reading and writing.
pub(crate) fn open_plain(path: &str) -> TermConResult<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(TermConError::setup("open file", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");

        let err = RawFileConnector::new(path.to_string_lossy())
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, TermConError::Setup { operation: "open file", .. }));
    }

    #[tokio::test]
    async fn test_label_is_the_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let connection = RawFileConnector::new(path.clone()).connect().await.unwrap();
        assert_eq!(connection.label, path);
    }
}
