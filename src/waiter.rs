use std::{thread, time::Duration};

/// Linear backoff between attempts: each consumed attempt adds one step, up to a ceiling.
pub struct Waiter {
    step: Duration,
    ceiling: Duration,
    sleep: Box<dyn FnMut(Duration)>,
}

impl Waiter {
    pub fn new(step: Duration, ceiling: Duration) -> Self {
        Self {
            step,
            ceiling,
            sleep: Box::new(thread::sleep),
        }
    }

    /// Replaces the actual sleeping, e.g. to observe delays without waiting for them.
    pub fn with_sleep(mut self, sleep: impl FnMut(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn delay(&self, consumed: usize) -> Duration {
        let consumed = u32::try_from(consumed).unwrap_or(u32::MAX);
        self.step.saturating_mul(consumed).min(self.ceiling)
    }

    /// Waits before the next attempt. Nothing happens ahead of the first one.
    pub fn wait(&mut self, consumed: usize) {
        let delay = self.delay(consumed);
        if !delay.is_zero() {
            log::debug!("waiting {:?} before the next attempt", delay);
            (self.sleep)(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::Waiter;

    #[test]
    fn delay_is_linear_and_capped() {
        let waiter = Waiter::new(Duration::from_secs(2), Duration::from_secs(5));
        let delays: Vec<_> = (0..6).map(|consumed| waiter.delay(consumed)).collect();
        assert_eq!(
            vec![
                Duration::ZERO,
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(5),
                Duration::from_secs(5),
                Duration::from_secs(5),
            ],
            delays
        );
        assert_eq!(Duration::from_secs(5), waiter.delay(usize::MAX));
    }

    #[test]
    fn first_attempt_does_not_wait() {
        let slept = Rc::new(RefCell::new(Vec::new()));
        let record = slept.clone();
        let mut waiter = Waiter::new(Duration::from_secs(1), Duration::from_secs(3))
            .with_sleep(move |delay| record.borrow_mut().push(delay));

        waiter.wait(0);
        waiter.wait(1);
        assert_eq!(vec![Duration::from_secs(1)], *slept.borrow());
    }
}
