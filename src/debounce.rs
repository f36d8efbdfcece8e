//! Search-input debouncing.
//!
//! Emits at most one value per quiet period: a value is forwarded only after
//! `quiet` has passed with no newer input. A value equal to the last one
//! forwarded is dropped, so re-sending the same filter cannot retrigger a
//! query.

use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Spawns a task that debounces `input` and returns the receiving end of the
/// debounced stream. Any pending value is flushed when `input` closes.
pub fn debounce<T>(input: Receiver<T>, quiet: Duration) -> (Receiver<T>, JoinHandle<()>)
where
    T: Clone + PartialEq + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let handle = tokio::spawn(run_debounce(input, tx, quiet));
    (rx, handle)
}

async fn run_debounce<T>(mut input: Receiver<T>, output: mpsc::Sender<T>, quiet: Duration)
where
    T: Clone + PartialEq + Send + 'static,
{
    let mut pending: Option<(T, Instant)> = None;
    let mut last_emitted: Option<T> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, deadline)| *deadline);
        tokio::select! {
            received = input.recv() => match received {
                Some(value) => {
                    trace!("Debounce input received; restarting quiet period");
                    pending = Some((value, Instant::now() + quiet));
                }
                None => {
                    if let Some((value, _)) = pending.take() {
                        emit(&output, value, &mut last_emitted).await;
                    }
                    return;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((value, _)) = pending.take() {
                    if !emit(&output, value, &mut last_emitted).await {
                        return;
                    }
                }
            }
        }
    }
}

/// Forwards `value` unless it repeats the last emission. Returns false once
/// the receiver is gone.
async fn emit<T: Clone + PartialEq>(
    output: &mpsc::Sender<T>,
    value: T,
    last_emitted: &mut Option<T>,
) -> bool {
    if last_emitted.as_ref() == Some(&value) {
        trace!("Debounced value unchanged; skipping");
        return true;
    }
    *last_emitted = Some(value.clone());
    output.send(value).await.is_ok()
}
