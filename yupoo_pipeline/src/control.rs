use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use std::sync::Arc;

/// Stop and pause signals of one run, shared between the pipeline and the UI.
///
/// Both are cooperative: the pipeline only looks at them between albums,
/// so an album whose downloads have started always runs to the end.
#[derive(Debug, Clone)]
pub struct PipelineControl {
    cancel: CancellationToken,
    pause: Arc<watch::Sender<bool>>,
}

impl Default for PipelineControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineControl {
    pub fn new() -> Self {
        let (pause, _) = watch::channel(false);
        PipelineControl {
            cancel: CancellationToken::new(),
            pause: Arc::new(pause),
        }
    }

    /// Stop before the next album. A paused run is released so it can stop.
    pub fn stop(&self) {
        self.cancel.cancel();
        self.pause.send_replace(false);
    }

    pub fn pause(&self) {
        self.pause.send_replace(true);
    }

    pub fn resume(&self) {
        self.pause.send_replace(false);
    }

    /// Return whether the run is paused afterwards.
    pub fn toggle_pause(&self) -> bool {
        let paused = !self.is_paused();
        self.pause.send_replace(paused);
        paused
    }

    pub fn is_paused(&self) -> bool {
        *self.pause.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait while paused. Return `false` if the run should stop.
    pub async fn checkpoint(&self) -> bool {
        if self.is_stopped() {
            return false;
        }
        if self.is_paused() {
            tracing::info!("Download paused");
            let mut receiver = self.pause.subscribe();
            tokio::select! {
                _ = receiver.wait_for(|paused| !*paused) => {}
                _ = self.cancel.cancelled() => {}
            }
            if !self.is_stopped() {
                tracing::info!("Download resumed");
            }
        }
        !self.is_stopped()
    }
}
