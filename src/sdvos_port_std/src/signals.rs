//! Tick-signal masking: this port's stand-in for an architecture's
//! interrupt-enable/disable bit.
//!
//! Every task thread keeps `SIGALRM` blocked except while it is the one
//! logically "running" task. POSIX delivers a process-directed signal to
//! an arbitrary thread that does not currently have it blocked, so with
//! exactly one thread ever unblocked at a time, the tick always lands on
//! whichever thread is actually running user code — the same effect a
//! single-core CPU's interrupt-enable flag has, achieved here with
//! `pthread_sigmask` instead.

use std::mem::MaybeUninit;

fn tick_sigset() -> libc::sigset_t {
    unsafe {
        let mut set = MaybeUninit::<libc::sigset_t>::uninit();
        libc::sigemptyset(set.as_mut_ptr());
        libc::sigaddset(set.as_mut_ptr(), libc::SIGALRM);
        set.assume_init()
    }
}

/// Block `SIGALRM` on the calling thread.
pub(crate) fn block_tick_signal() {
    let set = tick_sigset();
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
    assert_eq!(rc, 0, "pthread_sigmask(SIG_BLOCK) failed");
}

/// Unblock `SIGALRM` on the calling thread.
pub(crate) fn unblock_tick_signal() {
    let set = tick_sigset();
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_UNBLOCK, &set, std::ptr::null_mut()) };
    assert_eq!(rc, 0, "pthread_sigmask(SIG_UNBLOCK) failed");
}
