use crate::callback::{Callback, TokioExecutor};
use log::trace;
use slotmap::{DefaultKey, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task;
use tokio::task::JoinHandle;

/// Shortest period a timer may have; shorter requests are clamped to it.
pub const MIN_TIMER_PERIOD: Duration = Duration::from_millis(1);

/// The timer collaborator: single-shot and repeating timers on the local event loop.
///
/// Cloning gives another handle to the same set of timers, so a timer callback can clear itself
/// or other timers.
#[derive(Debug, Clone, Default)]
pub struct WebTimers {
    inner: Rc<RefCell<WebTimersInner>>,
}

#[derive(Debug, Default)]
pub struct WebTimersInner {
    timers: SlotMap<DefaultKey, Timer>,
}

impl WebTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` once after `duration`. The timer is forgotten after it fired.
    pub fn set_timeout(&self, duration: Duration, mut callback: Callback<TokioExecutor>) -> TimerId {
        let inner = self.inner.clone();

        let key = self.inner.borrow_mut().timers.insert_with_key(move |key| {
            let handle = task::spawn_local(async move {
                tokio::time::sleep(duration).await;

                callback.exec(&mut TokioExecutor);

                inner.borrow_mut().timers.remove(key);
            });

            Timer { handle }
        });

        trace!("timers: timeout {key:?} set for {duration:?}");
        TimerId(key)
    }

    /// Runs `callback` every `duration`. The first call happens after one full period, not
    /// immediately. Runs until cleared.
    pub fn set_interval(&self, duration: Duration, mut callback: Callback<TokioExecutor>) -> TimerId {
        let period = duration.max(MIN_TIMER_PERIOD);

        let handle = task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);

            interval.tick().await; // First tick is immediate

            loop {
                interval.tick().await;
                callback.exec(&mut TokioExecutor);
            }
        });

        let key = self.inner.borrow_mut().timers.insert(Timer { handle });

        trace!("timers: interval {key:?} set every {period:?}");
        TimerId(key)
    }

    /// Removes and cancels the timer with the given id. Clearing an unknown or already fired
    /// timer does nothing. Returns true when a pending timer was cancelled.
    pub fn clear(&self, id: TimerId) -> bool {
        // Release the borrow before aborting, the aborted task may drop values touching the timers
        let timer = self.inner.borrow_mut().timers.remove(id.0);

        match timer {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer
    pub fn clear_all(&self) {
        let timers: Vec<Timer> = self.inner.borrow_mut().timers.drain().map(|(_, timer)| timer).collect();

        for timer in timers {
            timer.handle.abort();
        }
    }

    /// Returns true when the timer is still pending (a timeout that has not fired, or any interval
    /// that has not been cleared)
    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.contains_key(id.0)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct Timer {
    handle: JoinHandle<()>,
}

/// Opaque handle returned by [`WebTimers::set_timeout`] and [`WebTimers::set_interval`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(DefaultKey);
