// Fd module - character devices and sockets driven by the reactor
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::unix::AsyncFd;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// An opened file descriptor usable as a relay stream.
///
/// Terminals, serial lines, pipes and sockets are switched to non-blocking
/// mode and polled through the reactor, so a pending read never holds up a
/// write on the same descriptor. Regular files cannot be polled; they are
/// always ready and are read and written directly.
#[derive(Debug)]
pub struct FdStream {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Polled(AsyncFd<File>),
    Regular(File),
}

impl FdStream {
    /// Must be called from within a tokio runtime for non-regular files.
    pub fn new(file: File) -> io::Result<Self> {
        if file.metadata()?.file_type().is_file() {
            return Ok(Self {
                inner: Inner::Regular(file),
            });
        }

        set_nonblocking(file.as_raw_fd())?;
        Ok(Self {
            inner: Inner::Polled(AsyncFd::new(file)?),
        })
    }

    pub fn is_polled(&self) -> bool {
        matches!(self.inner, Inner::Polled(_))
    }
}

impl AsRawFd for FdStream {
    fn as_raw_fd(&self) -> RawFd {
        match &self.inner {
            Inner::Polled(fd) => fd.as_raw_fd(),
            Inner::Regular(file) => file.as_raw_fd(),
        }
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

impl AsyncRead for FdStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            Inner::Regular(file) => {
                let n = file.read(buf.initialize_unfilled())?;
                buf.advance(n);
                Poll::Ready(Ok(()))
            }
            Inner::Polled(fd) => loop {
                let mut guard = ready!(fd.poll_read_ready(cx))?;
                let unfilled = buf.initialize_unfilled();
                match guard.try_io(|inner| inner.get_ref().read(unfilled)) {
                    Ok(Ok(n)) => {
                        buf.advance(n);
                        return Poll::Ready(Ok(()));
                    }
                    Ok(Err(e)) => return Poll::Ready(Err(e)),
                    Err(_would_block) => continue,
                }
            },
        }
    }
}

impl AsyncWrite for FdStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().inner {
            Inner::Regular(file) => Poll::Ready(file.write(data)),
            Inner::Polled(fd) => loop {
                let mut guard = ready!(fd.poll_write_ready(cx))?;
                match guard.try_io(|inner| inner.get_ref().write(data)) {
                    Ok(result) => return Poll::Ready(result),
                    Err(_would_block) => continue,
                }
            },
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        // Writes go straight to the descriptor
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
