//! Shared helpers for the scenario integration tests in this directory.
//!
//! Every scenario test runs a real `sdvos_port_std` simulation (one OS
//! thread per task, a real `SIGALRM` tick) exactly as `demos/blink` does,
//! and observes the outcome through a small ordered trace log rather than
//! by reaching into kernel internals.

use std::sync::Mutex;
use std::time::Duration;

/// An ordered log of observations, pushed to from task bodies and alarm
/// callbacks running on their own OS threads, read back from the test's
/// main thread once the scenario has had time to run to completion.
pub struct Trace(Mutex<Vec<&'static str>>);

impl Trace {
    pub const fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    pub fn push(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// Give the hosted simulation's real tick/thread scheduling time to settle.
/// The scenarios here are built around millisecond-scale tick periods, so a
/// generous multiple of that is enough slack for CI-grade scheduling jitter
/// without making the suite slow.
pub fn settle() {
    std::thread::sleep(Duration::from_millis(50));
}

pub fn settle_for(duration: Duration) {
    std::thread::sleep(duration);
}
