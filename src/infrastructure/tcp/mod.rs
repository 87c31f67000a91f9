// TCP module - single-connection server and client
pub mod client;
pub mod server;

pub use client::TcpClientConnector;
pub use server::{SingleAcceptor, TcpServerConnector};
