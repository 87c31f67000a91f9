use crate::core::session::Session;
use crate::domain::error::{TermConError, TermConResult};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace};

/// Largest chunk moved in one read/write pair
pub const CHUNK_SIZE: usize = 1024;

/// Duplex relay between the remote stream and the local terminal.
///
/// Each wake-up handles one readable side; whichever chunk was read is
/// written out as a single write before the next wait, so chunk boundaries
/// on one side become write boundaries on the other.
pub struct RelayLoop<R, L> {
    session: Session<R, L>,
    remote_buf: Box<[u8; CHUNK_SIZE]>,
    local_buf: Box<[u8; CHUNK_SIZE]>,
}

impl<R, L> RelayLoop<R, L>
where
    R: AsyncRead + AsyncWrite + Unpin,
    L: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(session: Session<R, L>) -> Self {
        Self {
            session,
            remote_buf: Box::new([0u8; CHUNK_SIZE]),
            local_buf: Box::new([0u8; CHUNK_SIZE]),
        }
    }

    /// Runs until the escape key (`Ok`), the first I/O fault or EOF on either
    /// side, or `cancel` resolving (all `Err`). `cancel` is watched while
    /// waiting for input and while a chunk is being written out. The session
    /// is dropped, and both streams closed, before this returns.
    pub async fn run<C>(self, cancel: C) -> TermConResult<()>
    where
        C: Future<Output = String>,
    {
        let Self {
            mut session,
            mut remote_buf,
            mut local_buf,
        } = self;
        tokio::pin!(cancel);

        let escape_key = session.options.escape_key;
        let echo = session.options.echo;

        loop {
            let inbound = tokio::select! {
                read = session.remote.read(&mut remote_buf[..]) => {
                    Inbound::Remote(checked_read(read, &session.remote_label)?)
                }
                read = session.local.read(&mut local_buf[..]) => {
                    Inbound::Local(checked_read(read, &session.local_label)?)
                }
                reason = &mut cancel => return Err(interrupted(reason)),
            };

            if let Inbound::Local(n) = inbound {
                if escape_key.matches(&local_buf[..n]) {
                    info!("Quit key {} pressed", escape_key);
                    return Ok(());
                }
            }

            let forward = async {
                match inbound {
                    Inbound::Remote(n) => {
                        let chunk = &remote_buf[..n];
                        trace!("{} -> {}: {}", session.remote_label, session.local_label, hex::encode(chunk));
                        write_chunk(&mut session.local, chunk, &session.local_label).await
                    }
                    Inbound::Local(n) => {
                        let chunk = &local_buf[..n];
                        if echo {
                            write_chunk(&mut session.local, chunk, &session.local_label).await?;
                        }
                        trace!("{} -> {}: {}", session.local_label, session.remote_label, hex::encode(chunk));
                        write_chunk(&mut session.remote, chunk, &session.remote_label).await
                    }
                }
            };

            tokio::select! {
                forwarded = forward => forwarded?,
                reason = &mut cancel => return Err(interrupted(reason)),
            }
        }
    }
}

/// Which side produced the chunk just read, and its length
#[derive(Debug, Clone, Copy)]
enum Inbound {
    Remote(usize),
    Local(usize),
}

fn interrupted(reason: String) -> TermConError {
    debug!("Relay cancelled: {}", reason);
    TermConError::Interrupted { signal: reason }
}

/// A zero-byte read is EOF; both EOF and errors end the session.
fn checked_read(read: std::io::Result<usize>, label: &str) -> TermConResult<usize> {
    match read {
        Ok(0) => Err(TermConError::Eof {
            label: label.to_string(),
        }),
        Ok(n) => Ok(n),
        Err(source) => Err(TermConError::Read {
            label: label.to_string(),
            source,
        }),
    }
}

/// One write call for the whole chunk; anything less is a fault.
async fn write_chunk<W>(stream: &mut W, chunk: &[u8], label: &str) -> TermConResult<()>
where
    W: AsyncWrite + Unpin,
{
    let write_error = |source| TermConError::Write {
        label: label.to_string(),
        source,
    };

    let written = stream.write(chunk).await.map_err(write_error)?;
    if written != chunk.len() {
        return Err(TermConError::ShortWrite {
            label: label.to_string(),
            expected: chunk.len(),
            written,
        });
    }
    stream.flush().await.map_err(write_error)
}
