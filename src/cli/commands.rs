use crate::cli::args::Args;
use crate::core::connector::connect;
use crate::core::relay::RelayLoop;
use crate::core::session::{Session, SessionOptions};
use crate::core::shutdown::ShutdownHandle;
use crate::domain::config::TermConConfig;
use crate::domain::endpoint::EndpointDescriptor;
use crate::domain::error::{TermConError, TermConResult};
use crate::domain::escape::EscapeKey;
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::signals::spawn_signal_listener;
use crate::infrastructure::terminal::{LocalTerminal, RawModeController};
use tracing::{debug, info};

/// Everything the session needs, resolved from arguments and configuration
/// before any connection is attempted.
#[derive(Debug)]
pub struct Plan {
    pub descriptor: EndpointDescriptor,
    pub options: SessionOptions,
    pub local_device: String,
}

impl Plan {
    /// Flags win over the configuration file.
    pub fn from_args(args: &Args, config: &TermConConfig) -> TermConResult<Self> {
        let quit_key = args.quit.as_deref().unwrap_or(&config.global.quit_key);
        let escape_key = EscapeKey::parse(quit_key)?;
        let descriptor = EndpointDescriptor::resolve(&args.target, args.overrides(), args.baud)?;

        Ok(Self {
            descriptor,
            options: SessionOptions {
                echo: args.echo || config.global.echo,
                escape_key,
            },
            local_device: config.global.local_device.clone(),
        })
    }
}

/// Load the configuration named by `--config`, or the global one.
pub fn load_config(args: &Args) -> TermConResult<TermConConfig> {
    let config_manager = ConfigManager::new();
    match &args.config {
        Some(path) => config_manager.load_config_from_path(path),
        None => config_manager.load_config(),
    }
}

/// Run one terminal session to completion.
///
/// `Ok` means the quit key was typed. Signals caught along the way surface
/// as `TermConError::Interrupted`; cleanup is left to the caller's `shutdown`.
pub async fn execute(args: Args, shutdown: &ShutdownHandle) -> TermConResult<()> {
    let config = load_config(&args)?;
    if let Err(e) = init_logging(&config.global.log_level, args.verbose) {
        debug!("{}", e);
    }

    let plan = Plan::from_args(&args, &config)?;
    spawn_signal_listener(shutdown.clone())?;

    let descriptor = &plan.descriptor;
    if descriptor.kind().is_server() {
        info!("Waiting for a connection on {}", descriptor.address());
    }

    let remote = tokio::select! {
        connected = connect(descriptor) => connected?,
        signal = shutdown.triggered() => {
            return Err(TermConError::Interrupted { signal });
        }
    };

    if let Some(peer) = &remote.peer {
        eprintln!("Connection accepted from {}", peer);
    }

    let terminal = LocalTerminal::open(&plan.local_device)?;
    let mut raw_mode = terminal.raw_mode()?;
    raw_mode.enter_raw()?;
    shutdown.install_raw_mode(Box::new(raw_mode));
    let local = terminal.into_connection()?;

    let session = Session::new(remote, local, plan.options);
    RelayLoop::new(session).run(shutdown.triggered()).await
}
