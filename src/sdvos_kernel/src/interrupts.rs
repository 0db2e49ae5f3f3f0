//! ISR entry trampoline and the interrupt-masking service family.
//!
//! A Category-2 ISR body runs wrapped in [`isr_enter`]/[`isr_exit`]; the
//! trampoline itself is the platform's job (it is what actually vectors a
//! hardware interrupt to the user ISR function), this module is only the
//! bookkeeping the kernel does around that call. Category-1 ISRs never
//! call into this module at all — they are invisible to the kernel by
//! definition.

use sdvos_core::klock::Critical;
use sdvos_core::Platform;

use crate::state::{ExecContext, Kernel};
use crate::task::reschedule;

/// Entered once per ISR activation, including nested ISRs (a higher-
/// priority interrupt arriving while a Category-2 ISR is already
/// running). Only the outermost entry flips `exec_ctx` to `Isr`; service
/// calls consult `exec_ctx`, not the raw depth, to reject operations
/// invalid from interrupt context.
pub fn isr_enter<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    let tok = Critical::enter::<P>();
    let depth = kernel.isr_depth.write(&tok);
    *depth += 1;
    if *depth == 1 {
        *kernel.exec_ctx.write(&tok) = ExecContext::Isr;
    }
}

/// Exited once per ISR activation. On unwinding to nesting depth zero,
/// restores task context and runs the scheduling decision that every
/// service call inside the ISR deferred (see
/// [`crate::task::reschedule`]'s `in_isr` short-circuit) — this is the
/// "on exit from the outermost ISR" dispatch point of spec section 4.C.
pub fn isr_exit<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    let tok = Critical::enter::<P>();
    let depth = kernel.isr_depth.write(&tok);
    debug_assert!(*depth > 0, "isr_exit without matching isr_enter");
    *depth -= 1;
    if *depth == 0 {
        *kernel.exec_ctx.write(&tok) = ExecContext::Task;
        reschedule(kernel, tok);
    } else {
        drop(tok);
    }
}

/// `SuspendAllInterrupts()`: disables every interrupt, Category-1 and
/// Category-2 alike, until the matching `ResumeAllInterrupts`. Nests.
///
/// This port has one hardware interrupt-mask primitive
/// ([`Platform::raw_enter_critical`]/`raw_exit_critical`), shared with
/// [`crate::dispatch`]'s own bookkeeping critical sections and with
/// `SuspendOSInterrupts` below — `all_interrupt_depth` exists only so
/// mismatched `Suspend`/`Resume` pairing between the two OSEK API
/// families is still caught, not to gate a second, independent mask.
pub fn suspend_all_interrupts<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    {
        let tok = Critical::enter::<P>();
        *kernel.all_interrupt_depth.write(&tok) += 1;
    }
    Critical::enter_raw::<P>();
}

/// `ResumeAllInterrupts()`.
pub fn resume_all_interrupts<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    {
        let tok = Critical::enter::<P>();
        let depth = kernel.all_interrupt_depth.write(&tok);
        debug_assert!(*depth > 0, "ResumeAllInterrupts without matching Suspend");
        *depth -= 1;
    }
    Critical::exit_raw::<P>();
}

/// `SuspendOSInterrupts()`: disables only the interrupts the kernel
/// services (Category-2 ISRs); Category-1 interrupts are meant to remain
/// enabled. This port has no separate masking level for the two
/// categories, so it shares the same hardware gate as
/// `SuspendAllInterrupts`, tracked under its own nesting counter.
pub fn suspend_os_interrupts<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    {
        let tok = Critical::enter::<P>();
        *kernel.os_interrupt_depth.write(&tok) += 1;
    }
    Critical::enter_raw::<P>();
}

/// `ResumeOSInterrupts()`.
pub fn resume_os_interrupts<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    {
        let tok = Critical::enter::<P>();
        let depth = kernel.os_interrupt_depth.write(&tok);
        debug_assert!(*depth > 0, "ResumeOSInterrupts without matching Suspend");
        *depth -= 1;
    }
    Critical::exit_raw::<P>();
}

/// `DisableAllInterrupts()`: the single-level, non-nesting primitive OSEK
/// reserves for the shortest, most latency-sensitive sections. Callers
/// must not call any other service before the matching
/// `EnableAllInterrupts` — unlike the suspend/resume pairs, this one is
/// not reentrant and the kernel tracks no depth for it.
pub fn disable_all_interrupts<P: Platform>() {
    P::raw_enter_critical();
}

/// `EnableAllInterrupts()`.
pub fn enable_all_interrupts<P: Platform>() {
    P::raw_exit_critical();
}
