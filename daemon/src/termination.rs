#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    OsSigQuit,
    OsSigTerm,
    UserInt,
}

const FORCE_QUIT_THRESHOLD: u8 = 3;

#[derive(Debug)]
/// The receiving side of the shutdown broadcast channel.
pub struct InterruptReceiver {
    interrupt_rx: broadcast::Receiver<Interrupted>,
}

impl InterruptReceiver {
    #[must_use]
    #[inline]
    pub fn new(interrupt_rx: broadcast::Receiver<Interrupted>) -> Self {
        Self { interrupt_rx }
    }

    /// Wait for an interrupt signal to be received.
    ///
    /// # Errors
    ///
    /// Fails if the interrupt signal cannot be received (e.g. the sender has been dropped)
    #[inline]
    pub async fn wait(&mut self) -> Result<Interrupted, broadcast::error::RecvError> {
        self.interrupt_rx.recv().await
    }
}

#[derive(Debug, Clone)]
/// The sending side of the shutdown broadcast channel.
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    #[must_use]
    #[inline]
    pub const fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    /// Send an interrupt signal to the application.
    ///
    /// # Errors
    ///
    /// Fails if the interrupt signal cannot be sent (e.g. the receiver has been dropped)
    #[inline]
    pub fn terminate(&self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }

    /// Broadcast one received signal. Returns whether the server should be force-quit.
    fn forward(&self, interrupted: Interrupted, kill_count: &mut u8) -> bool {
        if let Err(e) = self.terminate(interrupted) {
            log::warn!("failed to send {interrupted:?}: {e}");
        }
        *kill_count = kill_count.saturating_add(1);
        *kill_count >= FORCE_QUIT_THRESHOLD
    }
}

fn force_quit() -> ! {
    log::warn!("Received {FORCE_QUIT_THRESHOLD} signals, forcefully terminating the server");
    std::process::exit(1)
}

#[cfg(unix)]
async fn terminate_by_signal(terminator: Terminator) -> std::io::Result<()> {
    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut quit_signal = signal(SignalKind::quit())?;

    let mut kill_count = 0;

    // SIGINT has exactly one listener, so each Ctrl-C counts once.
    loop {
        let quit = tokio::select! {
            _ = interrupt_signal.recv() => terminator.forward(Interrupted::OsSigInt, &mut kill_count),
            _ = term_signal.recv() => terminator.forward(Interrupted::OsSigTerm, &mut kill_count),
            _ = quit_signal.recv() => terminator.forward(Interrupted::OsSigQuit, &mut kill_count),
        };
        if quit {
            force_quit();
        }
    }
}

#[cfg(not(unix))]
async fn terminate_by_signal(terminator: Terminator) -> std::io::Result<()> {
    let mut kill_count = 0;

    loop {
        tokio::signal::ctrl_c().await?;
        if terminator.forward(Interrupted::UserInt, &mut kill_count) {
            force_quit();
        }
    }
}

/// Create a broadcast channel for the server's shutdown signal.
///
/// OS signals are listened for on a dedicated thread; the third one exits the process.
///
/// # Errors
///
/// Fails if the runtime for the signal thread cannot be created.
#[allow(clippy::module_name_repetitions)]
#[inline]
pub fn create_termination() -> std::io::Result<(Terminator, InterruptReceiver)> {
    let (tx, rx) = broadcast::channel(2);
    let terminator = Terminator::new(tx);
    let interrupt = InterruptReceiver::new(rx);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .thread_name("aurca-terminator")
        .build()?;
    let terminator_clone = terminator.clone();

    std::thread::Builder::new()
        .name("aurca-signals".into())
        .spawn(move || {
            if let Err(e) = rt.block_on(terminate_by_signal(terminator_clone)) {
                log::error!("Failed to listen for shutdown signals: {e}");
            }
        })?;

    Ok((terminator, interrupt))
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    #[tokio::test]
    async fn test_terminate() {
        let (terminator, mut rx) = create_termination().unwrap();

        terminator
            .terminate(Interrupted::UserInt)
            .expect("failed to send interrupt signal");

        assert_eq!(rx.wait().await, Ok(Interrupted::UserInt));
    }

    #[tokio::test]
    async fn test_force_quit_on_third_signal() {
        let (tx, rx) = broadcast::channel(4);
        let terminator = Terminator::new(tx);
        let mut interrupt = InterruptReceiver::new(rx);
        let mut kill_count = 0;

        assert!(!terminator.forward(Interrupted::OsSigInt, &mut kill_count));
        assert!(!terminator.forward(Interrupted::OsSigInt, &mut kill_count));
        assert!(terminator.forward(Interrupted::OsSigTerm, &mut kill_count));
        assert_eq!(kill_count, 3);

        assert_eq!(interrupt.wait().await, Ok(Interrupted::OsSigInt));
        assert_eq!(interrupt.wait().await, Ok(Interrupted::OsSigInt));
        assert_eq!(interrupt.wait().await, Ok(Interrupted::OsSigTerm));
    }
}
