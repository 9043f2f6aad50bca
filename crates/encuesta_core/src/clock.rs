//! Wall-clock display and save-time stamping.
//!
//! # Responsibility
//! - Produce the human-readable timestamp stored in `SurveyRecord::date`.
//! - Drive the once-per-second on-screen clock.
//!
//! # Invariants
//! - The ticker touches only its own display value, never survey state.
//! - Dropping a `ClockTicker` stops its thread without waiting out a tick.

use chrono::{DateTime, Local, TimeZone};
use log::{debug, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Display format, day-first like the locale the surveys are taken in.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Source of the current display timestamp.
pub trait Clock {
    fn now_display(&self) -> String;
}

/// Local-time system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_display(&self) -> String {
        format_display(&Local::now())
    }
}

/// Clock frozen at one display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_display(&self) -> String {
        self.0.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_display(&self) -> String {
        (**self).now_display()
    }
}

/// Formats a timestamp the way it is shown on screen and stored.
pub fn format_display<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(DISPLAY_FORMAT).to_string()
}

/// Free-running background ticker.
pub struct ClockTicker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Starts a thread calling `on_tick` with the current display value once
    /// per second, first call immediately.
    pub fn start<C, F>(clock: C, mut on_tick: F) -> std::io::Result<Self>
    where
        C: Clock + Send + 'static,
        F: FnMut(String) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("encuesta-clock".to_string())
            .spawn(move || {
                debug!("event=clock_tick module=clock status=start");
                loop {
                    on_tick(clock.now_display());
                    // A stop message or a dropped sender both end the wait early.
                    match stop_rx.recv_timeout(TICK_INTERVAL) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("event=clock_tick module=clock status=stop");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Wakes the ticker thread and waits only for an in-flight callback.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=clock_tick module=clock status=error error_code=tick_panicked");
            }
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
