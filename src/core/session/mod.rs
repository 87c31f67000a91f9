// Session module - the two streams of one relay run
pub mod session;

pub use session::{Session, SessionOptions};
