// UNIX socket module - path-addressed stream sockets
pub mod client;
pub mod server;

pub use client::UnixClientConnector;
pub use server::{UnixServerConnector, UnixSingleAcceptor};
