//! TermCon Library
//!
//! Connects the controlling terminal to a serial line, a plain file, or a
//! TCP / UNIX-domain socket and relays bytes both ways until a quit key.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::connector::{connect, Connection};
pub use crate::core::relay::RelayLoop;
pub use crate::core::session::{Session, SessionOptions};
pub use crate::core::shutdown::{Outcome, ShutdownHandle};
pub use crate::domain::config::TermConConfig;
pub use crate::domain::endpoint::{EndpointDescriptor, EndpointKind, KindOverrides};
pub use crate::domain::error::{TermConError, TermConResult};
pub use crate::domain::escape::EscapeKey;
