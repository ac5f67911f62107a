//! Progress extraction from the engine's diagnostic stream.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::trace;

use super::types::ProgressSample;

const TIME_MARKER: &str = "time=";
/// Error lines kept for failure reports.
const MAX_ERROR_LINES: usize = 20;

/// Extracts the elapsed-time text following `time=` in a diagnostic line.
///
/// Returns the run of digits, `:` and `.` after the marker, or `None` when the
/// marker is missing or followed by something else (`time=N/A`).
pub fn extract_time(line: &str) -> Option<ProgressSample> {
    let start = line.find(TIME_MARKER)? + TIME_MARKER.len();
    let rest = &line[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(ProgressSample::new(&rest[..end]))
}

/// What a finished scan saw.
#[derive(Debug, Default)]
pub(crate) struct ScanOutcome {
    pub last: Option<ProgressSample>,
    pub error_lines: Vec<String>,
}

impl ScanOutcome {
    pub fn stderr(&self) -> Option<String> {
        (!self.error_lines.is_empty()).then(|| self.error_lines.join("\n"))
    }
}

/// Reads `reader` to the end, forwarding every sample to `tx`.
///
/// Lines end at `\n` or `\r`. A read error ends the scan like EOF does.
/// Returns the last sample seen.
pub async fn scan_progress<R>(reader: R, tx: &mpsc::Sender<ProgressSample>) -> Option<ProgressSample>
where
    R: AsyncRead + Unpin,
{
    scan_stream(reader, tx).await.last
}

pub(crate) async fn scan_stream<R>(mut reader: R, tx: &mpsc::Sender<ProgressSample>) -> ScanOutcome
where
    R: AsyncRead + Unpin,
{
    let mut outcome = ScanOutcome::default();
    let mut line = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                trace!("Diagnostic stream ended with error: {}", e);
                break;
            }
        };
        for &byte in &buf[..n] {
            if byte == b'\n' || byte == b'\r' {
                handle_line(&line, tx, &mut outcome).await;
                line.clear();
            } else {
                line.push(byte);
            }
        }
    }
    handle_line(&line, tx, &mut outcome).await;

    outcome
}

async fn handle_line(raw: &[u8], tx: &mpsc::Sender<ProgressSample>, outcome: &mut ScanOutcome) {
    if raw.is_empty() {
        return;
    }
    let line = String::from_utf8_lossy(raw);

    if let Some(sample) = extract_time(&line) {
        // A closed receiver only means nobody is watching.
        let _ = tx.send(sample.clone()).await;
        outcome.last = Some(sample);
    } else if line.to_ascii_lowercase().contains("error") {
        if outcome.error_lines.len() == MAX_ERROR_LINES {
            outcome.error_lines.remove(0);
        }
        outcome.error_lines.push(line.into_owned());
    }
}
