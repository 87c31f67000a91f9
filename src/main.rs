// TermCon - attach the terminal to a serial line or a socket
use clap::error::ErrorKind;
use clap::Parser;
use termcon::cli::{execute, Args};
use termcon::core::shutdown::{Outcome, ShutdownHandle};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let shutdown = ShutdownHandle::new();
    // Leave through process::exit: a blocking read on the terminal would
    // otherwise keep the runtime from shutting down.
    match execute(args, &shutdown).await {
        Ok(()) => shutdown.exit(Outcome::Escaped, None),
        Err(e) => shutdown.exit(Outcome::Failed, Some(&e.to_string())),
    }
}
