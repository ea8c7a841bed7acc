use futures::FutureExt;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Bounded retry with a fixed delay. The error of the last attempt is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: usize, delay: Duration) -> Self {
        RetryPolicy {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub async fn run<R, E, T, F>(&self, mut f: F) -> Result<R, E>
    where
        E: Display,
        T: Future<Output = Result<R, E>>,
        F: FnMut() -> T,
    {
        use tokio_retry::{strategy::FixedInterval, Retry};

        let attempts = self.attempts;
        let strategy = FixedInterval::new(self.delay).take(attempts - 1);
        let mut attempt = 0;
        let action = move || {
            attempt += 1;
            let current = attempt;
            f().map(move |result| {
                if let Err(e) = &result {
                    tracing::warn!("Attempt {}/{} failed: {}", current, attempts, e);
                }
                result
            })
        };
        Retry::spawn(strategy, action).await
    }
}
