use crossbeam_channel::{select, Receiver};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Runs `work` every `every` on its own named thread until the shutdown
/// channel is signalled or its sender is dropped.
pub fn spawn(
    name: &str,
    every: Duration,
    shutdown: Receiver<()>,
    mut work: impl FnMut() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let ticks = crossbeam_channel::tick(every);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            loop {
                select! {
                    recv(ticks) -> _ => work(),
                    recv(shutdown) -> _ => break,
                }
            }
            debug!("tick loop stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_until_shutdown() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let (shutdown_tx, shutdown_rx) = unbounded();
        let handle = spawn("test-ticker", Duration::from_millis(5), shutdown_rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        thread::sleep(Duration::from_millis(100));
        drop(shutdown_tx);
        handle.join().unwrap();
        let ticked = count.load(Ordering::SeqCst);
        assert!(ticked >= 2, "expected at least two ticks, got {ticked}");
    }

    #[test]
    fn explicit_signal_also_stops_the_loop() {
        let (shutdown_tx, shutdown_rx) = unbounded();
        let handle = spawn("test-ticker", Duration::from_secs(3600), shutdown_rx, || {}).unwrap();
        shutdown_tx.send(()).unwrap();
        handle.join().unwrap();
    }
}
