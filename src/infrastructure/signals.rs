// Signals module - turns process signals into a shutdown request
use crate::core::shutdown::ShutdownHandle;
use crate::domain::error::{TermConError, TermConResult};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::info;

fn register(kind: SignalKind, name: &'static str) -> TermConResult<Signal> {
    signal(kind).map_err(TermConError::setup("signal", name))
}

/// Listens for SIGINT, SIGQUIT, SIGTERM and SIGPIPE and triggers `shutdown`
/// on the first one.
pub fn spawn_signal_listener(shutdown: ShutdownHandle) -> TermConResult<JoinHandle<()>> {
    let mut interrupt = register(SignalKind::interrupt(), "SIGINT")?;
    let mut quit = register(SignalKind::quit(), "SIGQUIT")?;
    let mut terminate = register(SignalKind::terminate(), "SIGTERM")?;
    let mut pipe = register(SignalKind::pipe(), "SIGPIPE")?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = quit.recv() => "SIGQUIT",
            _ = terminate.recv() => "SIGTERM",
            _ = pipe.recv() => "SIGPIPE",
        };
        info!("Received {}", name);
        shutdown.trigger(name);
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_listener_registers_and_stays_idle() {
        let shutdown = ShutdownHandle::new();
        let handle = spawn_signal_listener(shutdown.clone()).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!shutdown.is_triggered());
        assert!(!handle.is_finished());
        handle.abort();
    }
}
