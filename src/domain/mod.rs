// Domain module - descriptors, keys, configuration and errors
pub mod config;
pub mod endpoint;
pub mod error;
pub mod escape;
pub mod literal;
