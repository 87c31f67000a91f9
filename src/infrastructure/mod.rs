// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod fd;
pub mod logging;
pub mod serial;
pub mod signals;
pub mod tcp;
pub mod terminal;
pub mod unix;
