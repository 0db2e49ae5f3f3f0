//! Platform collaborator interfaces.
//!
//! These are the seams the kernel core never implements itself: board/MCU
//! bring-up, the context-switch trampoline, and interrupt wiring are all
//! out of scope for this crate and are instead provided by whatever
//! implements [`Platform`] — a bare-metal port, or (for tests and the
//! demo) `sdvos_port_std`'s hosted simulation.

use crate::id::TaskId;

/// The architecture- (or simulation-) specific primitives the kernel core
/// is built on.
///
/// A type implementing `Platform` never touches kernel state directly; it
/// only ever receives a [`TaskId`] and is responsible for making that task
/// run (or stop running) on the real CPU.
pub trait Platform {
    /// Disable preemption and interrupts. May be called while already
    /// disabled (nesting is the kernel's responsibility, see
    /// [`crate::klock`]); each call to `raw_enter_critical` is paired with
    /// exactly one call to `raw_exit_critical`.
    fn raw_enter_critical();

    /// Re-enable interrupts. Called exactly once for each
    /// `raw_enter_critical`, but only invoked by the kernel at true nesting
    /// depth zero.
    fn raw_exit_critical();

    /// Save the callee-saved context of `prev` and hand the CPU to `next`.
    /// Returns once `prev` is rescheduled and resumes past the point where
    /// it yielded — unlike `start`/`resume`, this call site is re-entered
    /// rather than abandoned, since `prev` still has a live call stack
    /// sitting in some kernel service.
    ///
    /// `next_fresh` distinguishes the two ways a task can become `next`:
    /// `true` means this is a new activation instance with nothing to
    /// resume (it must begin at its entry function with an empty stack,
    /// exactly as a first-time start would); `false` means `next` has a
    /// real saved context to restore, from an earlier preemption or a
    /// `WaitEvent` it's just been released from.
    fn dispatch(prev: TaskId, next: TaskId, next_fresh: bool);

    /// Hand the CPU to `next` with nothing of the caller's own to save:
    /// either there was no task running at all (the tick or another ISR
    /// is switching away from idle), or the caller's task just terminated
    /// or chained away and has no execution state worth preserving. The
    /// caller is never revisited through this call; it is free to wind
    /// down and exit on its own terms once this returns. `next_fresh`
    /// carries the same meaning as in [`Platform::dispatch`].
    fn switch_away(next: TaskId, next_fresh: bool);

    /// The one true cold-start: nothing has ever run on this image before.
    /// Starts `next` at its entry function with no context to save or
    /// restore. Never returns.
    fn start(task: TaskId) -> !;

    /// One-time hardware bring-up for the periodic tick source.
    fn interrupt_init();

    /// Architecture-specific sleep/halt entered when no task is runnable.
    /// Never returns: the tick or another interrupt that makes a task
    /// ready is expected to switch execution away from this loop
    /// entirely, on bare metal by overwriting the interrupted return
    /// address during the interrupt's own dispatch rather than by this
    /// call actually returning.
    fn idle_loop() -> !;

    /// Halts the system after a fatal, unrecoverable kernel invariant
    /// violation. Never returns.
    fn panic(message: &str) -> !;
}
