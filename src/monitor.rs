//! Monitoring lifecycle
//!
//! [`Monitor`] is the application context shared by the GUI and the headless
//! commands. It parses the refresh interval, owns the one [`Scheduler`] that
//! may exist, and receives readings from the scheduler thread over a channel
//! so that consumers only ever touch them on their own thread.
//!
//! ```text
//! Configuring --start--> Monitoring --(stop | read failure)--> Terminated
//! ```

use std::fmt;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ConfigError, Error, ReadError, Result};
use crate::scheduler::Scheduler;
use crate::sensors::{Reading, TemperatureSource};

/// Interval used when the input is left blank
pub const DEFAULT_INTERVAL_SECS: f64 = 5.0;

/// Validated refresh period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshInterval {
    seconds: f64,
    duration: Duration,
}

impl RefreshInterval {
    pub fn from_secs(seconds: f64) -> std::result::Result<Self, ConfigError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ConfigError::NotPositive(seconds));
        }
        let duration =
            Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::TooLarge(seconds))?;
        Ok(Self { seconds, duration })
    }

    /// Parse the interval field; blank means [`DEFAULT_INTERVAL_SECS`]
    pub fn parse(text: &str) -> std::result::Result<Self, ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        let seconds: f64 = text
            .parse()
            .map_err(|_| ConfigError::NotNumeric(text.to_string()))?;
        Self::from_secs(seconds)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.seconds
    }

    pub fn as_duration(&self) -> Duration {
        self.duration
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_INTERVAL_SECS,
            duration: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

/// Why monitoring ended
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The user closed the monitor
    Requested,
    /// A tick failed to read a temperature
    ReadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorState {
    Configuring,
    Monitoring { interval: RefreshInterval },
    Terminated(StopReason),
}

/// Message from the scheduler thread to the consumer
#[derive(Debug)]
pub enum MonitorEvent {
    Reading(Reading),
    Failed(ReadError),
}

/// Application context: state machine, scheduler and latest reading
pub struct Monitor {
    source: Arc<dyn TemperatureSource>,
    state: MonitorState,
    scheduler: Option<Scheduler>,
    events: Option<Receiver<MonitorEvent>>,
    latest: Option<Reading>,
    failure: Option<ReadError>,
}

impl Monitor {
    pub fn new(source: Arc<dyn TemperatureSource>) -> Self {
        Self {
            source,
            state: MonitorState::Configuring,
            scheduler: None,
            events: None,
            latest: None,
            failure: None,
        }
    }

    /// Parse `interval_text` and start monitoring
    ///
    /// `waker` runs on the scheduler thread after every event is queued; the
    /// GUI uses it to request a repaint. On a configuration error the monitor
    /// stays in [`MonitorState::Configuring`].
    pub fn start<W>(&mut self, interval_text: &str, waker: W) -> Result<RefreshInterval>
    where
        W: Fn() + Send + 'static,
    {
        if self.state != MonitorState::Configuring {
            return Err(Error::AlreadyStarted);
        }
        let interval = RefreshInterval::parse(interval_text).map_err(|e| {
            log::warn!("rejected update interval {:?}: {}", interval_text, e);
            e
        })?;
        self.start_with(interval, waker)?;
        Ok(interval)
    }

    /// Start monitoring with an already validated interval
    pub fn start_with<W>(&mut self, interval: RefreshInterval, waker: W) -> Result<()>
    where
        W: Fn() + Send + 'static,
    {
        if self.state != MonitorState::Configuring {
            return Err(Error::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel();
        let source = self.source.clone();
        let scheduler = Scheduler::schedule(interval.as_duration(), move || {
            let (event, flow) = match source.read() {
                Ok(reading) => {
                    log::debug!(
                        "tick: gpu {} cpu {:.1}",
                        reading.gpu_raw,
                        reading.cpu_celsius
                    );
                    (MonitorEvent::Reading(reading), ControlFlow::Continue(()))
                }
                Err(err) => (MonitorEvent::Failed(err), ControlFlow::Break(())),
            };
            if tx.send(event).is_err() {
                return ControlFlow::Break(());
            }
            waker();
            flow
        })?;

        log::info!("monitoring started, updating every {}", interval);
        self.scheduler = Some(scheduler);
        self.events = Some(rx);
        self.state = MonitorState::Monitoring { interval };
        Ok(())
    }

    /// Cancel the scheduler and end monitoring
    pub fn stop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        self.events = None;
        if !matches!(self.state, MonitorState::Terminated(_)) {
            log::info!("monitoring stopped");
            self.state = MonitorState::Terminated(StopReason::Requested);
        }
    }

    /// Drain pending events without blocking
    ///
    /// Returns the newest reading received by this call, if any.
    pub fn poll(&mut self) -> Option<Reading> {
        let mut newest = None;
        loop {
            let event = match self.events.as_ref().map(Receiver::try_recv) {
                Some(Ok(event)) => event,
                Some(Err(TryRecvError::Empty)) | None => break,
                Some(Err(TryRecvError::Disconnected)) => {
                    self.events = None;
                    break;
                }
            };
            match self.handle(event) {
                Some(reading) => newest = Some(reading),
                None => break,
            }
        }
        newest
    }

    /// Block until the next reading arrives
    ///
    /// Returns `Ok(None)` once monitoring is over for any reason other than a
    /// read failure, and the read error when a tick fails.
    pub fn next_reading(&mut self) -> Result<Option<Reading>> {
        let event = match self.events.as_ref().map(Receiver::recv) {
            Some(Ok(event)) => event,
            Some(Err(_)) | None => return Ok(None),
        };
        match self.handle(event) {
            Some(reading) => Ok(Some(reading)),
            None => match self.failure.take() {
                Some(err) => Err(Error::Read(err)),
                None => Ok(None),
            },
        }
    }

    fn handle(&mut self, event: MonitorEvent) -> Option<Reading> {
        match event {
            MonitorEvent::Reading(reading) => {
                self.latest = Some(reading.clone());
                Some(reading)
            }
            MonitorEvent::Failed(err) => {
                log::error!("temperature read failed, stopping monitor: {}", err);
                if let Some(mut scheduler) = self.scheduler.take() {
                    scheduler.stop();
                }
                self.events = None;
                self.state = MonitorState::Terminated(StopReason::ReadFailed(err.to_string()));
                self.failure = Some(err);
                None
            }
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_monitoring(&self) -> bool {
        matches!(self.state, MonitorState::Monitoring { .. })
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, MonitorState::Terminated(_))
    }

    /// Most recent reading; replaced on every tick
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// The read error that terminated monitoring, if any
    pub fn take_failure(&mut self) -> Option<ReadError> {
        self.failure.take()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;

    /// Source that succeeds `ok_reads` times, then fails
    struct FakeSource {
        reads: AtomicUsize,
        ok_reads: usize,
    }

    impl FakeSource {
        fn healthy() -> Arc<Self> {
            Self::failing_after(usize::MAX)
        }

        fn failing_after(ok_reads: usize) -> Arc<Self> {
            Arc::new(Self {
                reads: AtomicUsize::new(0),
                ok_reads,
            })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl TemperatureSource for FakeSource {
        fn read_gpu_text(&self) -> std::result::Result<String, ReadError> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if n >= self.ok_reads {
                return Err(ReadError::NotNumeric("garbage".to_string()));
            }
            Ok("45.6".to_string())
        }

        fn read_cpu_temperature(&self) -> std::result::Result<f64, ReadError> {
            Ok(44.1)
        }
    }

    fn poll_until(monitor: &mut Monitor, mut done: impl FnMut(&Monitor) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            monitor.poll();
            if done(monitor) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!(RefreshInterval::parse("").unwrap().as_secs_f64(), 5.0);
        assert_eq!(RefreshInterval::parse("  ").unwrap().as_secs_f64(), 5.0);
        assert_eq!(RefreshInterval::parse("2.5").unwrap().as_secs_f64(), 2.5);
        assert_eq!(
            RefreshInterval::parse("2.5").unwrap().as_duration(),
            Duration::from_millis(2500)
        );
        assert_eq!(RefreshInterval::parse(" 10 ").unwrap().as_secs_f64(), 10.0);
    }

    #[test]
    fn test_interval_rejects_bad_input() {
        assert_eq!(
            RefreshInterval::parse("abc"),
            Err(ConfigError::NotNumeric("abc".to_string()))
        );
        assert_eq!(RefreshInterval::parse("0"), Err(ConfigError::NotPositive(0.0)));
        assert_eq!(
            RefreshInterval::parse("-1"),
            Err(ConfigError::NotPositive(-1.0))
        );
        assert!(matches!(
            RefreshInterval::parse("inf"),
            Err(ConfigError::NotPositive(_))
        ));
        assert!(matches!(
            RefreshInterval::parse("NaN"),
            Err(ConfigError::NotPositive(_))
        ));
        assert_eq!(
            RefreshInterval::parse("1e300"),
            Err(ConfigError::TooLarge(1e300))
        );
    }

    #[test]
    fn test_start_uses_default_interval() {
        let mut monitor = Monitor::new(FakeSource::healthy());
        let interval = monitor.start("", || {}).unwrap();
        assert_eq!(interval.as_secs_f64(), 5.0);
        assert_eq!(monitor.state(), &MonitorState::Monitoring { interval });
        monitor.stop();
    }

    #[test]
    fn test_start_uses_given_interval() {
        let mut monitor = Monitor::new(FakeSource::healthy());
        let interval = monitor.start("2.5", || {}).unwrap();
        assert_eq!(interval.as_secs_f64(), 2.5);
        assert!(monitor.is_monitoring());
        monitor.stop();
    }

    #[test]
    fn test_bad_interval_stays_configuring() {
        let source = FakeSource::healthy();
        let mut monitor = Monitor::new(source.clone());
        assert!(matches!(
            monitor.start("fast", || {}),
            Err(Error::Config(ConfigError::NotNumeric(_)))
        ));
        assert_eq!(monitor.state(), &MonitorState::Configuring);
        assert_eq!(source.reads(), 0);

        monitor.start("1", || {}).unwrap();
        assert!(monitor.is_monitoring());
        monitor.stop();
    }

    #[test]
    fn test_second_start_rejected() {
        let mut monitor = Monitor::new(FakeSource::healthy());
        monitor.start("60", || {}).unwrap();
        assert!(matches!(
            monitor.start("60", || {}),
            Err(Error::AlreadyStarted)
        ));
        assert!(monitor.is_monitoring());

        monitor.stop();
        assert!(matches!(
            monitor.start("60", || {}),
            Err(Error::AlreadyStarted)
        ));
    }

    #[test]
    fn test_readings_reach_consumer() {
        let woken = Arc::new(AtomicBool::new(false));
        let flag = woken.clone();
        let mut monitor = Monitor::new(FakeSource::healthy());
        monitor
            .start("0.01", move || flag.store(true, Ordering::SeqCst))
            .unwrap();

        assert!(poll_until(&mut monitor, |m| m.latest().is_some()));
        assert!(poll_until(&mut monitor, |_| woken.load(Ordering::SeqCst)));

        let reading = monitor.latest().unwrap();
        assert_eq!(reading.gpu_text(), "GPU temperature: 45.6℃");
        assert_eq!(reading.cpu_text(), "CPU temperature: 44.1℃");
        assert!(reading.taken_at <= Local::now());
        monitor.stop();
    }

    #[test]
    fn test_read_failure_terminates_within_one_tick() {
        let source = FakeSource::failing_after(2);
        let mut monitor = Monitor::new(source.clone());
        monitor.start("0.01", || {}).unwrap();

        assert!(poll_until(&mut monitor, Monitor::is_terminated));
        assert!(matches!(
            monitor.state(),
            MonitorState::Terminated(StopReason::ReadFailed(_))
        ));
        assert!(matches!(
            monitor.take_failure(),
            Some(ReadError::NotNumeric(_))
        ));

        // No tick runs after the failing one.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(source.reads(), 3);
    }

    #[test]
    fn test_next_reading_reports_failure() {
        let mut monitor = Monitor::new(FakeSource::failing_after(1));
        monitor.start("0.01", || {}).unwrap();

        let first = monitor.next_reading().unwrap();
        assert_eq!(first.map(|r| r.gpu_celsius), Some(45.6));
        assert!(matches!(
            monitor.next_reading(),
            Err(Error::Read(ReadError::NotNumeric(_)))
        ));
        assert!(monitor.is_terminated());
        assert!(matches!(monitor.next_reading(), Ok(None)));
    }

    #[test]
    fn test_stop_is_prompt_and_idempotent() {
        let source = FakeSource::healthy();
        let mut monitor = Monitor::new(source.clone());
        monitor.start("3600", || {}).unwrap();

        let started = Instant::now();
        monitor.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            monitor.state(),
            &MonitorState::Terminated(StopReason::Requested)
        );
        monitor.stop();
        assert_eq!(
            monitor.state(),
            &MonitorState::Terminated(StopReason::Requested)
        );
        assert!(matches!(monitor.next_reading(), Ok(None)));
        assert!(source.reads() <= 1);
    }
}
