//! Recitation playback.
//!
//! Players announce natural end of a clip through an [`EndedSignal`]. Each
//! playback gets a generation number and stopping bumps it, so an end event
//! from a clip that was already stopped never reaches subscribers.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, warn};

/// Imperative control over a single audio output.
pub trait AudioPlayer: Send {
    /// Replaces the current source, stopping anything that is playing.
    fn load(&mut self, url: Option<String>);
    fn play(&mut self) -> io::Result<()>;
    fn pause(&mut self);
    /// Pauses and rewinds to the start of the clip.
    fn stop(&mut self);
    fn subscribe_ended(&self) -> EndedSubscription;
}

/// Sending side of the "clip finished by itself" event.
#[derive(Clone)]
pub struct EndedSignal {
    tx: broadcast::Sender<u64>,
    current: Arc<AtomicU64>,
}

impl Default for EndedSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl EndedSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self {
            tx,
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts a new playback and returns its generation.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidates the running playback so its end is not reported.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Reports that playback `generation` reached its end.
    pub fn notify(&self, generation: u64) {
        // No subscribers is fine: nobody is showing this clip any more.
        let _ = self.tx.send(generation);
    }

    pub fn subscribe(&self) -> EndedSubscription {
        EndedSubscription {
            rx: self.tx.subscribe(),
            current: self.current.clone(),
        }
    }
}

/// Receiving side of [`EndedSignal`]. Dropping it unsubscribes.
pub struct EndedSubscription {
    rx: broadcast::Receiver<u64>,
    current: Arc<AtomicU64>,
}

impl EndedSubscription {
    /// Resolves when the current playback ends naturally. Cancel safe.
    pub async fn ended(&mut self) {
        loop {
            match self.rx.recv().await {
                Ok(generation) if generation == self.current.load(Ordering::SeqCst) => return,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
            }
        }
    }
}

/// Plays clips by running an external command with the URL appended,
/// e.g. `mpv --no-video <url>`.
///
/// Pausing terminates the process, so resuming restarts the clip.
pub struct ProcessPlayer {
    command: Vec<String>,
    source: Option<String>,
    ended: EndedSignal,
    playback: Option<oneshot::Sender<()>>,
}

impl ProcessPlayer {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            source: None,
            ended: EndedSignal::new(),
            playback: None,
        }
    }

    fn spawn(&self, url: &str) -> io::Result<tokio::process::Child> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no player command configured"))?;
        Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
    }
}

fn log_exit(status: io::Result<ExitStatus>) {
    match status {
        Ok(s) if s.success() => debug!("recitation finished"),
        Ok(s) => warn!("audio player exited with {}", s),
        Err(e) => warn!("failed to wait for audio player: {}", e),
    }
}

impl AudioPlayer for ProcessPlayer {
    fn load(&mut self, url: Option<String>) {
        self.stop();
        self.source = url;
    }

    fn play(&mut self) -> io::Result<()> {
        let url = self
            .source
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no audio source loaded"))?;
        self.stop();

        let mut child = self.spawn(&url)?;
        let generation = self.ended.begin();
        let ended = self.ended.clone();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status),
                _ = cancel_rx => None,
            };
            match exited {
                // A player that dies early still ends playback.
                Some(status) => {
                    log_exit(status);
                    ended.notify(generation);
                }
                None => {
                    if let Err(e) = child.kill().await {
                        debug!("audio player already gone: {}", e);
                    }
                }
            }
        });

        self.playback = Some(cancel_tx);
        Ok(())
    }

    fn pause(&mut self) {
        self.ended.cancel();
        if let Some(cancel) = self.playback.take() {
            let _ = cancel.send(());
        }
    }

    fn stop(&mut self) {
        self.pause();
    }

    fn subscribe_ended(&self) -> EndedSubscription {
        self.ended.subscribe()
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn current_generation_end_is_delivered() {
        let signal = EndedSignal::new();
        let mut sub = signal.subscribe();

        let generation = signal.begin();
        signal.notify(generation);

        timeout(Duration::from_secs(1), sub.ended())
            .await
            .expect("end event should arrive");
    }

    #[tokio::test]
    async fn cancelled_generation_end_is_ignored() {
        let signal = EndedSignal::new();
        let mut sub = signal.subscribe();

        let generation = signal.begin();
        signal.cancel();
        signal.notify(generation);

        assert!(timeout(Duration::from_millis(50), sub.ended()).await.is_err());
    }

    #[tokio::test]
    async fn play_without_source_fails() {
        let mut player = ProcessPlayer::new(vec!["true".into()]);
        let err = player.play().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_exit_reports_end() {
        let mut player = ProcessPlayer::new(vec!["true".into()]);
        let mut sub = player.subscribe_ended();
        player.load(Some("https://verses.example/a.mp3".into()));

        player.play().expect("`true` should spawn");

        timeout(Duration::from_secs(5), sub.ended())
            .await
            .expect("process exit should be reported");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn paused_process_does_not_report_end() {
        let mut player = ProcessPlayer::new(vec!["sleep".into()]);
        let mut sub = player.subscribe_ended();
        // `sleep 5` once the URL slot is filled with the duration.
        player.load(Some("5".into()));

        player.play().expect("`sleep` should spawn");
        player.pause();

        assert!(timeout(Duration::from_millis(200), sub.ended()).await.is_err());
    }
}
