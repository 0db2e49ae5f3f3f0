//! Service-call dispatch and error reporting.
//!
//! Every public service in this crate funnels its non-`E_OK` return value
//! through [`report`], which records it in the process-wide [`OsError`]
//! record and invokes `ErrorHook`, all collapsed onto OSEK's single flat
//! `StatusType` instead of one Rust enum per service.

use sdvos_core::klock::Critical;
use sdvos_core::{OsError, Platform, ServiceId, StatusType};

use crate::state::Kernel;

/// Record the outcome of `service` and invoke `ErrorHook` if it failed and
/// hooks are configured. Takes `result` by reference so call sites keep
/// ownership of whatever value (or unit) the service actually returns.
pub(crate) fn report<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
    T,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: &Critical,
    service: ServiceId,
    result: &sdvos_core::error::Result<T>,
) {
    if let Err(status) = result {
        *kernel.last_error.write(tok) = Some(OsError {
            service,
            status: *status,
        });
        if let Some(hook) = kernel.cfg.hooks.error {
            hook(*status);
        }
    }
}

/// The most recent service failure, for `ErrorHook` bodies (or anything
/// else) that want to introspect which service failed and how, mirroring
/// OSEK's `OSErrorGetServiceId()`/`OSError...` accessor family collapsed
/// into one record.
pub fn last_error<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) -> Option<OsError> {
    let tok = Critical::enter::<P>();
    *kernel.last_error.read(&tok)
}

/// Expands to an early-return of `$err` when `$cond` is false, but only in
/// `extended_status` builds. A standard-status build elides the check
/// entirely and trusts the caller, the way OSEK's STANDARD conformance
/// class permits skipping most argument validation for speed.
#[cfg(feature = "extended_status")]
macro_rules! check {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}
#[cfg(not(feature = "extended_status"))]
macro_rules! check {
    ($cond:expr, $err:expr) => {
        let _ = || {
            // Keep the condition and error type-checked even when elided,
            // so standard-status and extended-status builds can't silently
            // diverge in which identifiers they reference.
            let _: bool = $cond;
            let _: StatusType = $err;
        };
    };
}

pub(crate) use check;
