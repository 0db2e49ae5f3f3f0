//! Thread-per-task plumbing for the hosted simulation.
//!
//! Every SDVOS task is backed by one real OS thread, parked on a
//! blocking socket read whenever it isn't the logical "CPU". Handing the
//! (simulated) CPU to a task is a single byte written to its socket;
//! taking it away is the calling thread blocking on its own socket read.
//! This is the same token-passing shape as the teacher's
//! `r3_port_std::threading_unix`, pared down to what a single-core,
//! cooperative-at-the-OS-thread-level simulation needs: we drop the
//! `longjmp`-based remote-park primitive entirely, because this port
//! never needs to force a *specific* OS thread to stop running arbitrary
//! user code — the kernel's own dispatch points already guarantee only
//! one task thread is ever unblocked at a time, and real preemption by
//! the tick is achieved by signal masking (see `lib.rs`), not by forcibly
//! unwinding a thread's stack.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};

/// One task's parking socket pair and lazily-spawned OS thread.
pub(crate) struct TaskThread {
    entry: fn(),
    spawned: AtomicBool,
    // `UnixStream` is used only for its raw fd; socketpair(2) gives us a
    // connected pair directly, matching `threading_unix.rs`'s own choice
    // of `socketpair` over a pipe (bidirectional, so either end could in
    // principle read or write, though we only ever use one direction per
    // end here).
    read_end: UnixStream,
    write_end: UnixStream,
}

fn socketpair() -> (UnixStream, UnixStream) {
    UnixStream::pair().expect("socketpair() failed")
}

impl TaskThread {
    pub(crate) fn new(entry: fn()) -> Self {
        let (read_end, write_end) = socketpair();
        Self {
            entry,
            spawned: AtomicBool::new(false),
            read_end,
            write_end,
        }
    }

    /// Deposit one wake-up token. Idempotent-ish: a second token written
    /// before the first is consumed just makes the next `park` return
    /// immediately instead of blocking, which is harmless here since a
    /// task thread only ever expects to be woken once per dispatch.
    pub(crate) fn wake(&self) {
        (&self.write_end)
            .write_all(&[0u8])
            .expect("failed to deposit wake token");
    }

    /// Block until a token is available.
    pub(crate) fn park(&self) {
        let mut byte = [0u8];
        loop {
            match (&self.read_end).read(&mut byte) {
                Ok(1) => return,
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => panic!("failed to consume wake token: {e}"),
            }
        }
    }

    /// Spawn the backing OS thread the first time this task is ever
    /// started. The thread body loops forever: park until woken, then run
    /// the task's entry point. A task that calls `TerminateTask` (or is
    /// re-activated after terminating) simply means its next iteration of
    /// this loop starts the entry function over from the top, exactly as
    /// a statically-declared OSEK task is re-entered fresh on every
    /// activation.
    pub(crate) fn ensure_spawned(self: &'static Self) {
        if self
            .spawned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let entry = self.entry;
        std::thread::Builder::new()
            .name("sdvos-task".into())
            .spawn(move || {
                crate::signals::block_tick_signal();
                loop {
                    self.park();
                    crate::signals::unblock_tick_signal();
                    entry();
                    crate::signals::block_tick_signal();
                }
            })
            .expect("failed to spawn task thread");
    }
}
