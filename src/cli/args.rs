use crate::domain::endpoint::KindOverrides;
use crate::domain::literal::parse_c_integer;
use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Modes:
  Serial line (like minicom):      termcon [-t] [-b BAUDRATE] /dev/ttyUSB0
  TCP client:                      termcon -c www.something.org:80
  TCP server:                      termcon -s :8080
  UNIX socket client:              termcon -c /tmp/my_named_socket
  UNIX socket server:              termcon -s /tmp/my_named_socket

Without -t/-s/-c the mode is guessed from TARGET: an address with ':' is a
socket unless it also contains '/', a path with '/' is a device, and a
socket address starting with ':' (or without ':') is a server.";

/// Command line arguments for TermCon
#[derive(Parser, Debug)]
#[command(
    name = "termcon",
    version = env!("CARGO_PKG_VERSION"),
    about = "Connect the terminal to a serial line, a file, or a TCP/UNIX socket",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// tty device, path to a local socket, or [host]:port
    pub target: String,

    /// Work as a serial communication program (the default for device paths)
    #[arg(short = 't', long = "term")]
    pub term: bool,

    /// Set the baud rate of the serial line; implies --term
    #[arg(short = 'b', long = "baud", value_parser = parse_baud)]
    pub baud: Option<u32>,

    /// Accept one connection on the socket as a server
    #[arg(short = 's', long = "server", conflicts_with_all = ["client", "term", "baud"])]
    pub server: bool,

    /// Connect to the socket as a client
    #[arg(short = 'c', long = "client", conflicts_with_all = ["term", "baud"])]
    pub client: bool,

    /// Echo keyboard input locally
    #[arg(short = 'e', long = "echo")]
    pub echo: bool,

    /// Quit key: 0x01, 001, or "control-a", "cntrl/a", "ctrl/a" (default ctrl/a)
    #[arg(short = 'q', long = "quit", value_name = "KEY")]
    pub quit: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> KindOverrides {
        KindOverrides {
            term: self.term || self.baud.is_some(),
            server: self.server,
            client: self.client,
        }
    }
}

fn parse_baud(value: &str) -> Result<u32, String> {
    parse_c_integer(value)
        .and_then(|rate| u32::try_from(rate).ok())
        .ok_or_else(|| format!("Invalid baud rate: \"{}\"", value))
}
