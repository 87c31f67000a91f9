// Core module - connection setup, relay loop and shutdown
pub mod connector;
pub mod relay;
pub mod session;
pub mod shutdown;

pub use connector::{connect, BoxedStream, ByteStream, Connection, Connector};
pub use relay::{RelayLoop, CHUNK_SIZE};
pub use session::{Session, SessionOptions};
pub use shutdown::{Outcome, ShutdownHandle};
