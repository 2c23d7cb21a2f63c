use std::time::Duration;
use tokio::sync::mpsc;

/// Forwards the latest submitted value once input has been quiet for `delay`
///
/// Values submitted while the timer is running replace the pending one and
/// restart the timer. Dropping the `Debouncer` discards any pending value and
/// closes the output channel; dropping the receiver stops the task, after
/// which `submit` returns false.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task; must be called inside a tokio runtime
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<T>();
        let (output_tx, output_rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            loop {
                let mut latest = tokio::select! {
                    first = input_rx.recv() => match first {
                        Some(value) => value,
                        None => return,
                    },
                    _ = output_tx.closed() => return,
                };

                loop {
                    tokio::select! {
                        next = input_rx.recv() => match next {
                            Some(value) => latest = value,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => break,
                        _ = output_tx.closed() => return,
                    }
                }

                if output_tx.send(latest).is_err() {
                    return;
                }
            }
        });

        (Self { tx: input_tx }, output_rx)
    }

    /// Submit a value; returns false once the task has stopped
    pub fn submit(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.submit("a");
        debouncer.submit("ab");
        debouncer.submit("abc");

        assert_eq!(rx.recv().await, Some("abc"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_value_restarts_timer() {
        let (debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.submit(1);
        sleep(Duration::from_millis(200)).await;
        debouncer.submit(2);
        sleep(Duration::from_millis(200)).await;

        // 400ms after the first value, but only 200ms after the second
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_values_all_emitted() {
        let (debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.submit("first");
        sleep(Duration::from_millis(400)).await;
        debouncer.submit("second");

        assert_eq!(rx.recv().await, Some("first"));
        assert_eq!(rx.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_fails_once_receiver_dropped() {
        let (debouncer, rx) = Debouncer::new(DELAY);
        assert!(debouncer.submit(1));

        drop(rx);
        sleep(Duration::from_millis(1)).await;

        assert!(!debouncer.submit(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_and_closes() {
        let (debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.submit("pending");
        drop(debouncer);

        assert_eq!(rx.recv().await, None);
    }
}
