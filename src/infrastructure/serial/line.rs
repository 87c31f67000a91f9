use crate::domain::error::TermConResult;
use serialport::{SerialPort, TTYPort};
use std::fs::File;
use std::os::unix::io::{FromRawFd, IntoRawFd};
use tracing::debug;

/// Applies `rate` to an already opened terminal device and hands the same
/// descriptor back. Only the line speed changes; the device is left
/// non-exclusive.
pub fn apply_baud(device: File, rate: u32) -> TermConResult<File> {
    // SAFETY: `into_raw_fd` transfers ownership of the descriptor to the port.
    let mut port = unsafe { TTYPort::from_raw_fd(device.into_raw_fd()) };

    port.set_exclusive(false)?;
    port.set_baud_rate(rate)?;
    debug!("Line speed set to {} baud", rate);

    // SAFETY: same descriptor, released by the port without being closed.
    Ok(unsafe { File::from_raw_fd(port.into_raw_fd()) })
}
