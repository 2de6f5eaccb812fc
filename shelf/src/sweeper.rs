//! Background reporting of overdue reservations.
//!
//! A [`Sweeper`] runs one read-only query per cycle and hands every
//! reservation older than its threshold to a [`Notifier`]. It never
//! changes the store. [`Sweeper::spawn`] moves it onto its own thread,
//! where a [`Schedule`] decides when cycles run: on a fixed interval, or
//! only when [`SweeperHandle::trigger`] is called.
//!
//! # Examples
//!
//! ```
//! use shelf::sweeper::{CollectingNotifier, Schedule, Sweeper};
//! use shelf::{FixedClock, LoanKey, LoanPolicy, MemoryStore, NewBook, Title, DAY};
//! use std::time::SystemTime;
//!
//! let clock = FixedClock::new(SystemTime::now());
//! let mut store = MemoryStore::new();
//! shelf::add_book(&mut store, NewBook::new(Title::new("Foundation").unwrap(), "Isaac Asimov")).unwrap();
//! shelf::loan(&mut store, &LoanPolicy::default(), LoanKey::parse("carol", "Foundation").unwrap()).unwrap();
//!
//! let notifier = CollectingNotifier::new();
//! let handle = Sweeper::new(store, notifier.clone(), DAY * 7)
//!     .with_clock(clock.clone())
//!     .spawn(Schedule::manual());
//!
//! clock.advance(DAY * 10);
//! handle.trigger();
//! let stats = handle.stop();
//!
//! assert_eq!(stats.cycles, 1);
//! assert_eq!(notifier.reservations().len(), 1);
//! ```

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::reservation::Reservation;
use crate::store::{Store, DAY};

/// Receives overdue reservations.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    /// Called once per overdue reservation per cycle, oldest first. `now`
    /// is the time the cycle's cutoff was computed from.
    fn notify(&self, reservation: &Reservation, now: SystemTime);
}

/// Logs each overdue reservation at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    fn message(reservation: &Reservation, now: SystemTime) -> String {
        let days = reservation.age(now).as_secs() / DAY.as_secs();
        format!(
            "overdue: {} has held '{}' for {days} days (reservation {})",
            reservation.borrower(),
            reservation.title(),
            reservation.id()
        )
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, reservation: &Reservation, now: SystemTime) {
        log::warn!("{}", Self::message(reservation, now));
    }
}

/// Collects overdue reservations in memory. Clones share the collection.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    seen: Arc<Mutex<Vec<Reservation>>>,
}

impl CollectingNotifier {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, in arrival order.
    #[must_use]
    pub fn reservations(&self) -> Vec<Reservation> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empties the collection and returns what it held.
    pub fn drain(&self) -> Vec<Reservation> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, reservation: &Reservation, _now: SystemTime) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reservation.clone());
    }
}

/// Where a sweeper is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Waiting for the next tick.
    Idle,
    /// Querying for overdue reservations.
    Scanning,
    /// Handing results to the notifier.
    Reporting,
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// The time the cutoff was computed from.
    pub checked_at: SystemTime,
    /// Age beyond which a reservation counts as overdue.
    pub threshold: Duration,
    /// Overdue reservations, oldest first.
    pub overdue: Vec<Reservation>,
}

/// Totals over a sweeper thread's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweeperStats {
    /// Cycles that completed.
    pub cycles: u64,
    /// Cycles whose query failed.
    pub failed_cycles: u64,
    /// Notifications sent.
    pub reported: u64,
}

/// Scans a store for overdue reservations.
pub struct Sweeper<S: Store, N: Notifier> {
    store: S,
    notifier: N,
    threshold: Duration,
    clock: Box<dyn Clock>,
    state: SweepState,
}

impl<S: Store, N: Notifier> Sweeper<S, N> {
    /// Creates an idle sweeper using the system clock.
    pub fn new(store: S, notifier: N, threshold: Duration) -> Self {
        Self {
            store,
            notifier,
            threshold,
            clock: Box::new(SystemClock),
            state: SweepState::Idle,
        }
    }

    /// Measures reservation age against `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The current state; `Idle` between cycles.
    #[must_use]
    pub const fn state(&self) -> SweepState {
        self.state
    }

    /// Overdue threshold in use.
    #[must_use]
    pub const fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Runs one scan-and-report cycle.
    ///
    /// # Errors
    ///
    /// Returns the store error if the query fails. Nothing is reported for
    /// that cycle and the sweeper goes back to idle.
    pub fn run_cycle(&mut self) -> Result<SweepReport> {
        let now = self.clock.now();
        let threshold = self.threshold;

        self.state = SweepState::Scanning;
        let overdue = match self.store.read(|ops| ops.list_overdue(threshold, now)) {
            Ok(overdue) => overdue,
            Err(e) => {
                self.state = SweepState::Idle;
                return Err(e);
            }
        };

        self.state = SweepState::Reporting;
        for reservation in &overdue {
            self.notifier.notify(reservation, now);
        }
        self.state = SweepState::Idle;

        log::debug!("sweep found {} overdue reservation(s)", overdue.len());
        Ok(SweepReport {
            checked_at: now,
            threshold,
            overdue,
        })
    }
}

impl<S, N> Sweeper<S, N>
where
    S: Store + Send + 'static,
    N: Notifier + 'static,
{
    /// Moves the sweeper onto a background thread driven by `schedule`.
    ///
    /// A failed cycle is logged and counted; the thread waits for the next
    /// tick and tries again.
    #[must_use]
    pub fn spawn(mut self, schedule: Schedule) -> SweeperHandle {
        let (control_tx, control_rx) = channel();

        let handle = thread::spawn(move || {
            let mut stats = SweeperStats::default();
            let mut run_now = schedule.immediate;

            loop {
                if schedule
                    .max_cycles
                    .is_some_and(|max| stats.cycles + stats.failed_cycles >= max)
                {
                    break;
                }

                if !run_now && !schedule.wait(&control_rx) {
                    break;
                }
                run_now = false;

                match self.run_cycle() {
                    Ok(report) => {
                        stats.cycles += 1;
                        stats.reported += report.overdue.len() as u64;
                    }
                    Err(e) => {
                        stats.failed_cycles += 1;
                        log::error!("overdue sweep failed: {e}");
                    }
                }
            }

            stats
        });

        SweeperHandle {
            control_tx,
            handle: Some(handle),
        }
    }
}

enum Control {
    Tick,
    Stop,
}

/// When a spawned sweeper runs its cycles.
///
/// # Examples
///
/// ```
/// use shelf::sweeper::Schedule;
/// use std::time::Duration;
///
/// let schedule = Schedule::every(Duration::from_secs(3600))
///     .starting_immediately()
///     .limited_to(3);
/// assert_eq!(schedule.interval(), Some(Duration::from_secs(3600)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval: Option<Duration>,
    immediate: bool,
    max_cycles: Option<u64>,
}

impl Schedule {
    /// A cycle every `interval`, plus one per trigger.
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            immediate: false,
            max_cycles: None,
        }
    }

    /// Cycles run only when triggered.
    #[must_use]
    pub const fn manual() -> Self {
        Self {
            interval: None,
            immediate: false,
            max_cycles: None,
        }
    }

    /// Runs the first cycle without waiting.
    #[must_use]
    pub const fn starting_immediately(mut self) -> Self {
        self.immediate = true;
        self
    }

    /// Stops the thread after `cycles` cycles, failed ones included.
    #[must_use]
    pub const fn limited_to(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// The tick interval, if any.
    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Blocks until the next cycle is due. Returns `false` on stop.
    fn wait(&self, control: &Receiver<Control>) -> bool {
        let received = match self.interval {
            Some(interval) => match control.recv_timeout(interval) {
                Ok(control) => control,
                Err(RecvTimeoutError::Timeout) => Control::Tick,
                Err(RecvTimeoutError::Disconnected) => Control::Stop,
            },
            None => control.recv().unwrap_or(Control::Stop),
        };
        matches!(received, Control::Tick)
    }
}

/// Controls a sweeper thread. Dropping the handle stops the thread.
#[derive(Debug)]
pub struct SweeperHandle {
    control_tx: Sender<Control>,
    handle: Option<JoinHandle<SweeperStats>>,
}

impl SweeperHandle {
    /// Requests a cycle now.
    ///
    /// Triggers sent while a cycle is running queue up.
    pub fn trigger(&self) {
        // A send error means the thread already finished
        let _ = self.control_tx.send(Control::Tick);
    }

    /// Stops the thread after any queued cycles and returns its totals.
    #[must_use]
    pub fn stop(mut self) -> SweeperStats {
        let _ = self.control_tx.send(Control::Stop);
        self.take_stats()
    }

    /// Waits for the thread to finish on its own.
    ///
    /// Only returns once the schedule's cycle limit is reached, so the
    /// schedule should be [`limited_to`](Schedule::limited_to) some count.
    #[must_use]
    pub fn join(mut self) -> SweeperStats {
        self.take_stats()
    }

    fn take_stats(&mut self) -> SweeperStats {
        self.handle
            .take()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    log::error!("sweeper thread panicked");
                    SweeperStats::default()
                })
            })
            .unwrap_or_default()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.control_tx.send(Control::Stop);
            let _ = self.take_stats();
        }
    }
}
