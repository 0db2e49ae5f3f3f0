//! Hosted simulation [`sdvos_core::Platform`] for running SDVOS
//! applications (and `sdvos_kernel`'s own scenario tests) as an ordinary
//! process on Linux/macOS, with no board or MCU involved.
//!
//! Every task is backed by one real OS thread (see [`threading`]);
//! handing the simulated CPU to a task is depositing a wake token on its
//! socket, and taking it away is the calling thread blocking on its own.
//! The periodic tick that drives [`sdvos_kernel::counter::tick_handler`]
//! is a real `SIGALRM` armed with `setitimer(2)`; preemption is achieved
//! by keeping that signal unblocked on exactly one thread at a time (see
//! [`signals`]), so it always lands on whichever task is logically
//! running, mirroring the single hardware interrupt-enable flag a bare-
//! metal port would toggle instead.
#![cfg(unix)]

mod signals;
mod threading;

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use sdvos_core::{Platform, TaskId};

use threading::TaskThread;

static REGISTRY: OnceCell<Vec<TaskThread>> = OnceCell::new();
static TICK: OnceCell<fn()> = OnceCell::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// How often `SIGALRM` fires once armed, in microseconds. `1_000` matches
/// the 1ms tick base the blink demo's `SYS_COUNTER` is declared against.
const TICK_PERIOD_US: i64 = 1_000;

/// Wires up the hosted simulation: one backing thread per task entry
/// point, and the tick trampoline that connects the timer signal to a
/// concrete, statically-declared `Kernel`.
///
/// `tick` has to be a plain `fn()` rather than a closure: a POSIX signal
/// handler carries no captured state, so the application supplies a
/// small wrapper that closes over its own `'static` `Kernel` instance —
/// typically `|| { sdvos_kernel::tick_handler(&KERNEL); }` coerced to a
/// function pointer (see `demos/blink`).
///
/// Must be called exactly once, before `sdvos_kernel::start_os`.
pub fn init(task_entries: &'static [fn()], tick: fn()) {
    if INITIALIZED.swap(true, Ordering::AcqRel) {
        panic!("sdvos_port_std::init called more than once");
    }
    let threads = task_entries.iter().map(|&entry| TaskThread::new(entry)).collect();
    let _ = REGISTRY.set(threads);
    let _ = TICK.set(tick);
}

fn registry() -> &'static [TaskThread] {
    REGISTRY
        .get()
        .expect("sdvos_port_std::init was never called")
        .as_slice()
}

extern "C" fn on_tick_signal(_signum: libc::c_int) {
    if let Some(tick) = TICK.get() {
        tick();
    }
}

fn arm_tick_timer() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_tick_signal as usize;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        let rc = libc::sigaction(libc::SIGALRM, &action, std::ptr::null_mut());
        assert_eq!(rc, 0, "sigaction(SIGALRM) failed");

        let interval = libc::timeval {
            tv_sec: 0,
            tv_usec: TICK_PERIOD_US,
        };
        let spec = libc::itimerval {
            it_interval: interval,
            it_value: interval,
        };
        let rc = libc::setitimer(libc::ITIMER_REAL, &spec, std::ptr::null_mut());
        assert_eq!(rc, 0, "setitimer(ITIMER_REAL) failed");
    }
}

/// The hosted `Platform`. A unit struct: every method is a bare function
/// operating on the process-global [`REGISTRY`], matching how a bare-
/// metal port would operate on the one set of hardware registers its
/// image owns rather than on any instance state of its own.
pub struct StdPlatform;

impl Platform for StdPlatform {
    fn raw_enter_critical() {
        signals::block_tick_signal();
    }

    fn raw_exit_critical() {
        signals::unblock_tick_signal();
    }

    fn dispatch(prev: TaskId, next: TaskId, next_fresh: bool) {
        let reg = registry();
        let next_thread = &reg[next.index()];
        if next_fresh {
            next_thread.ensure_spawned();
        }
        next_thread.wake();

        // Give up the CPU: block our own tick delivery and wait to be
        // woken again, exactly where this call returns.
        signals::block_tick_signal();
        reg[prev.index()].park();
        signals::unblock_tick_signal();
    }

    fn switch_away(next: TaskId, next_fresh: bool) {
        let reg = registry();
        let next_thread = &reg[next.index()];
        if next_fresh {
            next_thread.ensure_spawned();
        }
        next_thread.wake();
        // Nothing of the caller's own needs preserving: it just
        // terminated or chained away. Returning here lets its own OS
        // thread unwind back to `threading::TaskThread::ensure_spawned`'s
        // loop, ready for its next activation.
    }

    fn start(task: TaskId) -> ! {
        let reg = registry();
        let thread = &reg[task.index()];
        thread.ensure_spawned();
        thread.wake();
        // The booting thread has nothing left to do; park it for good.
        signals::block_tick_signal();
        loop {
            std::thread::park();
        }
    }

    fn interrupt_init() {
        arm_tick_timer();
    }

    fn idle_loop() -> ! {
        // Unlike a bare-metal WFI, this leaves whichever OS thread called
        // it permanently dormant rather than resuming it later through
        // the same call stack: sdvos_port_std exists to run demos and
        // drive black-box scenarios, not to exercise the exact
        // interleaving of "idle entered from inside a WaitEvent that
        // still has something to resume" — see DESIGN.md.
        signals::unblock_tick_signal();
        loop {
            unsafe {
                libc::pause();
            }
        }
    }

    fn panic(message: &str) -> ! {
        log::error!("sdvos panic: {message}");
        std::process::exit(1);
    }
}
