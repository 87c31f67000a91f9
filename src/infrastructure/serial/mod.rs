// Serial module - terminal devices and the plain-file fallback
pub mod device;
pub mod line;
pub mod raw;

pub use device::SerialConnector;
pub use line::apply_baud;
pub use raw::RawFileConnector;
