//! The event-flag subsystem: extended tasks only, at most one pending
//! `WaitEvent` at a time, woken by `SetEvent` from either a task or an
//! ISR.

use sdvos_core::klock::Critical;
use sdvos_core::{error::Result, EventMask, Platform, ServiceId, StatusType, TaskId, TaskState, TaskKind};

use crate::dispatch;
use crate::state::Kernel;
use crate::task::{make_ready, reschedule};

fn is_extended<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> bool {
    kernel.cfg.tasks[task_id.index()].kind == TaskKind::Extended
}

/// `SetEvent(task_id, mask)`. Callable from task or ISR context.
pub fn set_event<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
    mask: EventMask,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(task_id.index() < kernel.cfg.tasks.len(), StatusType::Id);
        dispatch::check!(is_extended(kernel, task_id), StatusType::Access);
        let wakes = {
            let td = kernel.task(task_id).write(&tok);
            dispatch::check!(td.state != TaskState::Suspended, StatusType::State);
            td.event_pending |= mask;
            td.state == TaskState::Waiting && !(td.event_pending & td.event_wait).is_empty()
        };
        if wakes {
            kernel.task(task_id).write(&tok).event_wait = EventMask::NONE;
            make_ready(kernel, &tok, task_id);
        }
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::SetEvent, &result);
    reschedule(kernel, tok);
    result
}

/// `ClearEvent(mask)`. Clears bits in the calling task's own pending mask.
/// Task context only.
pub fn clear_event<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    mask: EventMask,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(!kernel.in_isr(&tok), StatusType::CallLevel);
        let current = kernel
            .running
            .read(&tok)
            .expect("ClearEvent called with no running task");
        dispatch::check!(is_extended(kernel, current), StatusType::Access);
        kernel.task(current).write(&tok).event_pending &= !mask;
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::ClearEvent, &result);
    result
}

/// `GetEvent(task_id)`: the current pending-event mask of any extended
/// task (not only the caller).
pub fn get_event<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> Result<EventMask> {
    let tok = Critical::enter::<P>();
    let result: Result<EventMask> = (|| {
        dispatch::check!(task_id.index() < kernel.cfg.tasks.len(), StatusType::Id);
        dispatch::check!(is_extended(kernel, task_id), StatusType::Access);
        dispatch::check!(
            kernel.task(task_id).read(&tok).state != TaskState::Suspended,
            StatusType::State
        );
        Ok(kernel.task(task_id).read(&tok).event_pending)
    })();
    dispatch::report(kernel, &tok, ServiceId::GetEvent, &result);
    result
}

/// `WaitEvent(mask)`: blocks the calling (extended) task until at least
/// one bit of `mask` becomes pending, unless one already is.
///
/// Must be called from task context, by an extended task, while holding
/// no resources (blocking while holding a ceiling-raising resource would
/// stall every task at or below the ceiling indefinitely).
pub fn wait_event<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    mask: EventMask,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(!kernel.in_isr(&tok), StatusType::CallLevel);
        let current = kernel
            .running
            .read(&tok)
            .expect("WaitEvent called with no running task");
        dispatch::check!(is_extended(kernel, current), StatusType::Access);
        dispatch::check!(
            kernel.task(current).read(&tok).holders_len() == 0,
            StatusType::Resource
        );
        let td = kernel.task(current).write(&tok);
        if (td.event_pending & mask).is_empty() {
            td.event_wait = mask;
            td.state = TaskState::Waiting;
        }
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::WaitEvent, &result);
    reschedule(kernel, tok);
    result
}
