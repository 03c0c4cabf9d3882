use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{trace, warn};

use crate::config::DEFAULT_TICK_INTERVAL;

#[derive(Debug, Default)]
struct Shared {
    elapsed_secs: AtomicU64,
    paused: AtomicBool,
    finished: AtomicBool,
}

#[derive(Debug)]
struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// A player's chess clock.
///
/// Elapsed time is counted in whole seconds.  Once started, a background thread adds one second
/// per `tick_interval` while the clock is not paused, and raises the finished flag when the
/// elapsed time reaches the limit.  The thread is stopped and joined by `stop` or on drop.
#[derive(Debug)]
pub struct Clock {
    shared: Arc<Shared>,
    limit_secs: Option<u64>,
    tick_interval: Duration,
    ticker: Option<Ticker>,
}

impl Clock {
    /// A stopped clock at zero.  A limit with a fraction of a second is rounded up.
    pub fn new(limit: Option<Duration>, tick_interval: Duration) -> Clock {
        let limit_secs = limit.map(|l| l.as_secs() + u64::from(l.subsec_nanos() > 0));
        Clock::restore(0, limit_secs, tick_interval)
    }

    /// A stopped clock that already shows `elapsed_secs`.
    pub(crate) fn restore(
        elapsed_secs: u64,
        limit_secs: Option<u64>,
        tick_interval: Duration,
    ) -> Clock {
        let shared = Shared::default();
        shared.elapsed_secs.store(elapsed_secs, Ordering::SeqCst);
        let clock = Clock {
            shared: Arc::new(shared),
            limit_secs,
            tick_interval: if tick_interval == Duration::from_secs(0) {
                DEFAULT_TICK_INTERVAL
            } else {
                tick_interval
            },
            ticker: None,
        };
        clock
            .shared
            .finished
            .store(clock.reached_limit(elapsed_secs), Ordering::SeqCst);
        clock
    }

    fn reached_limit(&self, elapsed_secs: u64) -> bool {
        self.limit_secs.map_or(false, |limit| elapsed_secs >= limit)
    }

    /// Start ticking.  Does nothing if the clock is already running.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let (stop, stop_rx) = mpsc::channel::<()>();
        let shared = Arc::clone(&self.shared);
        let limit = self.limit_secs;
        let interval = self.tick_interval;

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if shared.paused.load(Ordering::SeqCst) {
                        continue;
                    }
                    let elapsed = shared.elapsed_secs.fetch_add(1, Ordering::SeqCst) + 1;
                    if limit.map_or(false, |l| elapsed >= l) {
                        shared.finished.store(true, Ordering::SeqCst);
                    }
                }
                // stop requested, or the clock was dropped
                _ => break,
            }
        });

        trace!(interval_ms = interval.as_millis() as u64, "clock started");
        self.ticker = Some(Ticker { stop, handle });
    }

    /// Stop ticking for good.  A stopped clock keeps its reading and can be started again.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            // an Err here means the thread is already gone
            let _ = ticker.stop.send(());
            if ticker.handle.join().is_err() {
                warn!("clock thread panicked");
            }
            trace!(elapsed_secs = self.elapsed_secs(), "clock stopped");
        }
    }

    #[inline]
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Is the background thread alive?
    #[inline]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.shared.elapsed_secs.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_secs())
    }

    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_secs() / 60
    }

    pub fn limit_secs(&self) -> Option<u64> {
        self.limit_secs
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.limit_secs.map(Duration::from_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Has the clock used up its limit?  Never true for a clock without one.
    pub fn is_time_finished(&self) -> bool {
        self.shared.finished.load(Ordering::SeqCst) || self.reached_limit(self.elapsed_secs())
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}
