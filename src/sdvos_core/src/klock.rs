//! Critical section primitive and the locked-cell type kernel state lives
//! in.
//!
//! `EnterCritical`/`ExitCritical` nest arbitrarily; only the outermost
//! `ExitCritical` actually re-enables interrupts. [`Critical::enter`]
//! returns a guard whose `Drop` impl performs the matching exit, so a
//! critical section can never be left unbalanced by an early `return` or
//! `?`.
//!
//! State is monomorphic per application image — one static `Kernel`
//! instance per image, not an arbitrary number of differently-typed token
//! families — so [`KCell`] gates access with a runtime `debug_assert!`
//! that a [`Critical`] guard is held, rather than pulling in a generative
//! token-typing crate to enforce that statically. See `DESIGN.md` for the
//! dependency note.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::platform::Platform;

/// Global critical-section nesting depth. One instance of this exists per
/// application image, which matches there being exactly one statically
/// declared `Kernel` instance per image.
static DEPTH: AtomicUsize = AtomicUsize::new(0);

/// A held critical section. Dropping it exits the section, decrementing
/// the nesting depth and, at depth zero, re-enabling interrupts.
pub struct Critical {
    exit_raw: fn(),
}

impl Critical {
    /// Enter a critical section, disabling preemption and interrupts on
    /// the first (outermost) call.
    #[inline]
    pub fn enter<P: Platform>() -> Self {
        let prev = DEPTH.fetch_add(1, Ordering::Acquire);
        if prev == 0 {
            P::raw_enter_critical();
        }
        Self {
            exit_raw: P::raw_exit_critical,
        }
    }

    /// Current nesting depth, for diagnostics and call-level assertions.
    #[inline]
    pub fn depth() -> usize {
        DEPTH.load(Ordering::Relaxed)
    }

    /// As [`Critical::enter`], but without a guard: the matching
    /// [`Critical::exit_raw`] may be called arbitrarily later, from a
    /// different point in the call graph entirely.
    ///
    /// This is what the `Suspend*Interrupts`/`Resume*Interrupts` service
    /// pairs are built on (see `sdvos_kernel::interrupts`) — unlike every
    /// other use of [`Critical`], those services are explicitly meant to
    /// hold interrupts disabled across arbitrary intervening user code,
    /// not just for the lifetime of one function call.
    #[inline]
    pub fn enter_raw<P: Platform>() {
        let prev = DEPTH.fetch_add(1, Ordering::Acquire);
        if prev == 0 {
            P::raw_enter_critical();
        }
    }

    /// The matching exit for [`Critical::enter_raw`].
    #[inline]
    pub fn exit_raw<P: Platform>() {
        let prev = DEPTH.fetch_sub(1, Ordering::Release);
        debug_assert!(prev >= 1, "critical section underflow");
        if prev == 1 {
            P::raw_exit_critical();
        }
    }
}

impl Drop for Critical {
    #[inline]
    fn drop(&mut self) {
        let prev = DEPTH.fetch_sub(1, Ordering::Release);
        debug_assert!(prev >= 1, "critical section underflow");
        if prev == 1 {
            (self.exit_raw)();
        }
    }
}

/// A cell holding kernel state that is only ever touched while a
/// [`Critical`] section is held.
///
/// `KCell` is `Sync` so that arrays of them can live in `'static` storage,
/// but that `Sync` impl is an assertion about how the kernel *uses* the
/// cell (always under [`Critical`]), not a property the type system
/// enforces — the same trust boundary a hand-written interrupt-driven
/// kernel has around `EnterCritical`/`ExitCritical` bracketing every
/// shared-state touch.
pub struct KCell<T>(UnsafeCell<T>);

// Safety: every access to the wrapped value is required (by convention,
// checked with `debug_assert!` in `read`/`write`) to happen while a
// `Critical` section is held, which on every supported `Platform` means
// interrupts and preemption are both disabled — i.e. no other execution
// context can be concurrently accessing the same cell.
unsafe impl<T> Sync for KCell<T> {}

impl<T> KCell<T> {
    pub const fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// Read the cell's value. The caller must be holding a [`Critical`]
    /// section; `_tok` merely documents that requirement at the call site.
    #[inline]
    pub fn read(&self, _tok: &Critical) -> &T {
        debug_assert!(Critical::depth() > 0, "KCell read outside critical section");
        unsafe { &*self.0.get() }
    }

    /// Mutably access the cell's value under a held [`Critical`] section.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub fn write(&self, _tok: &Critical) -> &mut T {
        debug_assert!(
            Critical::depth() > 0,
            "KCell write outside critical section"
        );
        unsafe { &mut *self.0.get() }
    }
}
