//! Terminal progress display for running conversions.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use super::types::ProgressSample;

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);
const INITIAL_POSITION: &str = "00:00:00";

/// Formats seconds as `HH:MM:SS`, truncating fractions.
pub fn format_duration(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Spinner task showing `current / total` while passes run.
///
/// Owns the receiving end of the progress channel. [`finish`](Self::finish)
/// signals completion, drains queued samples and returns the last one.
pub struct ProgressDisplay {
    done_tx: oneshot::Sender<()>,
    handle: JoinHandle<Option<ProgressSample>>,
}

impl ProgressDisplay {
    /// Spawns a display drawing to stderr.
    pub fn spawn(total: impl Into<String>, rx: mpsc::Receiver<ProgressSample>) -> Self {
        let bar = ProgressBar::new_spinner();
        match ProgressStyle::with_template("{spinner} {msg}") {
            Ok(style) => bar.set_style(style.tick_strings(SPINNER_TICKS)),
            Err(e) => warn!("Invalid spinner template: {}", e),
        }
        Self::spawn_with(bar, total.into(), rx)
    }

    /// Spawns a display that draws nothing.
    pub fn hidden(total: impl Into<String>, rx: mpsc::Receiver<ProgressSample>) -> Self {
        Self::spawn_with(ProgressBar::hidden(), total.into(), rx)
    }

    fn spawn_with(bar: ProgressBar, total: String, rx: mpsc::Receiver<ProgressSample>) -> Self {
        let (done_tx, done_rx) = oneshot::channel();
        let handle = tokio::spawn(run_display(bar, total, rx, done_rx));
        Self { done_tx, handle }
    }

    /// Stops the display and returns the last sample it received.
    pub async fn finish(self) -> Option<ProgressSample> {
        // The task may already have exited; the join below still reports its value.
        let _ = self.done_tx.send(());
        match self.handle.await {
            Ok(last) => last,
            Err(e) => {
                warn!("Progress display task failed: {}", e);
                None
            }
        }
    }
}

async fn run_display(
    bar: ProgressBar,
    total: String,
    mut rx: mpsc::Receiver<ProgressSample>,
    mut done_rx: oneshot::Receiver<()>,
) -> Option<ProgressSample> {
    let mut ticker = tokio::time::interval(REDRAW_INTERVAL);
    let mut last: Option<ProgressSample> = None;
    let mut open = true;

    loop {
        tokio::select! {
            _ = &mut done_rx => break,
            sample = rx.recv(), if open => match sample {
                Some(sample) => last = Some(sample),
                None => open = false,
            },
            _ = ticker.tick() => {
                let current = last.as_ref().map(|s| s.as_str()).unwrap_or(INITIAL_POSITION);
                bar.set_message(format!("Convirtiendo... [{} / {}]", current, total));
                bar.tick();
            }
        }
    }

    while let Ok(sample) = rx.try_recv() {
        last = Some(sample);
    }
    bar.finish_and_clear();
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(-3.0), "00:00:00");
        assert_eq!(format_duration(f64::NAN), "00:00:00");
    }

    #[tokio::test]
    async fn test_finish_drains_queued_samples() {
        let (tx, rx) = mpsc::channel(8);
        let display = ProgressDisplay::hidden("00:10:00", rx);

        tx.send(ProgressSample::new("00:00:01.00")).await.unwrap();
        tx.send(ProgressSample::new("00:00:02.00")).await.unwrap();

        assert_eq!(
            display.finish().await,
            Some(ProgressSample::new("00:00:02.00"))
        );
    }

    #[tokio::test]
    async fn test_finish_without_samples() {
        let (_tx, rx) = mpsc::channel::<ProgressSample>(1);
        let display = ProgressDisplay::hidden("00:00:00", rx);
        assert_eq!(display.finish().await, None);
    }

    #[tokio::test]
    async fn test_closed_channel_keeps_last_sample() {
        let (tx, rx) = mpsc::channel(1);
        let display = ProgressDisplay::hidden("00:00:10", rx);
        tx.send(ProgressSample::new("00:00:09.00")).await.unwrap();
        drop(tx);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            display.finish().await,
            Some(ProgressSample::new("00:00:09.00"))
        );
    }
}
