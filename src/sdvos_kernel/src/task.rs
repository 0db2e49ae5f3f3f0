//! Task lifecycle services and the scheduler's dispatch-point logic.
//!
//! Every other subsystem that makes a task ready (events, resources,
//! alarms) funnels back through [`reschedule`] rather than duplicating the
//! "compare the ready queue head to whatever's running" decision.

use sdvos_core::klock::Critical;
use sdvos_core::{error::Result, Platform, Schedulability, ServiceId, StatusType, TaskId, TaskState};

use crate::dispatch;
use crate::state::Kernel;

fn is_non_preemptable<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> bool {
    kernel.cfg.tasks[task_id.index()].schedulability == Schedulability::NonPreemptable
}

/// Move `task_id` onto the ready queue at its current priority and mark
/// it READY. Caller must already hold `tok` and know the task isn't
/// already enqueued.
pub(crate) fn make_ready<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: &Critical,
    task_id: TaskId,
) {
    let td = kernel.task(task_id).write(tok);
    td.state = TaskState::Ready;
    let prio = td.current_priority;
    kernel.ready.write(tok).insert(prio, task_id);
}

/// `ActivateTask` body, assuming `task_id` has already been range-checked.
///
/// A SUSPENDED task becomes READY immediately. A task that is already
/// READY, RUNNING or WAITING instead queues another activation, up to
/// the task's configured `max_activations` (counting the instance
/// already in flight) — queued activations become READY one at a time,
/// as each prior instance terminates, in [`terminate_internal`].
pub(crate) fn activate_internal<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: &Critical,
    task_id: TaskId,
) -> Result<()> {
    let max_activations = kernel.cfg.tasks[task_id.index()].max_activations;
    let became_suspended_to_ready = {
        let td = kernel.task(task_id).write(tok);
        match td.state {
            TaskState::Suspended => {
                // A task's very first activation (or a re-activation after
                // it has already fully terminated) is the only time
                // `current_priority` needs resetting here: every other
                // transition either leaves it alone (re-queued activation
                // of an already-active task) or is handled by
                // `terminate_internal`, which restores it on every exit.
                td.current_priority = kernel.cfg.tasks[task_id.index()].priority;
                td.pending_activations = 0;
                td.fresh_start = true;
                true
            }
            _ => {
                if td.pending_activations + 1 >= max_activations {
                    return Err(StatusType::Limit);
                }
                td.pending_activations += 1;
                false
            }
        }
    };
    if became_suspended_to_ready {
        make_ready(kernel, tok, task_id);
    }
    Ok(())
}

/// `TerminateTask`/`ChainTask` shared tail: give up `task_id`'s current
/// instance, restore its base priority, and either make it READY again
/// (if a queued activation remains) or SUSPENDED.
pub(crate) fn terminate_internal<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: &Critical,
    task_id: TaskId,
) {
    let base_priority = kernel.cfg.tasks[task_id.index()].priority;
    let has_queued_activation = {
        let td = kernel.task(task_id).write(tok);
        td.current_priority = base_priority;
        td.event_pending = Default::default();
        td.event_wait = Default::default();
        // Whether or not another instance is queued, the instance that
        // just terminated is gone: whenever this task next runs (now, or
        // on some future `ActivateTask`) it starts fresh, not resumed.
        td.fresh_start = true;
        if td.pending_activations > 0 {
            td.pending_activations -= 1;
            true
        } else {
            td.state = TaskState::Suspended;
            false
        }
    };
    if has_queued_activation {
        make_ready(kernel, tok, task_id);
    }
}

/// Re-run the scheduling decision and, if warranted, hand the CPU to a
/// different task.
///
/// Called at the tail of every service that can change the ready set.
/// When called from within an ISR this is a no-op: the ISR trampoline
/// ([`crate::interrupts::isr_exit`]) makes the same call again once it has
/// unwound to the outermost ISR nesting level, which is the only point an
/// ISR is allowed to hand off the CPU.
pub(crate) fn reschedule<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: Critical,
) {
    reschedule_inner::<P, PRIOS, SLOTS, NEST>(kernel, tok, false)
}

/// As [`reschedule`], but also yields to a READY task of *equal* priority
/// — the behavior `Schedule()` grants a non-preemptable task that an
/// implicit dispatch point never would.
pub(crate) fn reschedule_cooperative<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: Critical,
) {
    reschedule_inner::<P, PRIOS, SLOTS, NEST>(kernel, tok, true)
}

fn reschedule_inner<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: Critical,
    allow_equal: bool,
) {
    if kernel.in_isr(&tok) {
        drop(tok);
        return;
    }

    let prev = *kernel.running.read(&tok);
    // `prev` may no longer actually be RUNNING: TerminateTask/ChainTask just
    // moved it to SUSPENDED/READY, or WaitEvent just moved it to WAITING,
    // without touching `kernel.running` themselves — that bookkeeping is
    // this function's job alone. When prev isn't runnable anymore a switch
    // is mandatory regardless of priority, even to nothing at all (idle).
    let prev_runnable =
        prev.map_or(false, |t| kernel.task(t).read(&tok).state == TaskState::Running);
    // Whether `prev`'s own context is even worth saving: a task that just
    // terminated has nothing to resume (its next run, whenever that is,
    // starts fresh), so there is no save to perform for it, regardless of
    // whether `prev_runnable` happens to be true (preemption, mid-run) or
    // false (just terminated). `fresh_start` is exactly this signal,
    // because `terminate_internal` sets it on the very task being given up.
    let prev_needs_save =
        prev.map_or(false, |t| !kernel.task(t).read(&tok).fresh_start);
    let head = kernel.ready.read(&tok).peek_highest();

    let should_switch = if !prev_runnable {
        true
    } else {
        match head {
            Some((prio, _)) => {
                let p = prev.unwrap();
                let running_prio = kernel.task(p).read(&tok).current_priority;
                // A task declared non-preemptable behaves, for the duration
                // of its run, as though it held an implicit MAX_PRIO-ceiling
                // resource (spec.md 4.C): nothing can preempt it regardless
                // of its own current priority. `Schedule()` is the one
                // dispatch point exempted from this floor — it is defined
                // as momentarily releasing and reacquiring that implicit
                // resource, which is exactly `allow_equal`'s caller.
                let floor = if !allow_equal && is_non_preemptable(kernel, p) {
                    (PRIOS - 1) as u8
                } else {
                    running_prio
                };
                prio > floor || (allow_equal && prio == running_prio)
            }
            None => false,
        }
    };
    if !should_switch {
        drop(tok);
        return;
    }

    let next = match head {
        None => {
            // Nothing runnable at all: only reachable when `prev` just
            // stopped being runnable, so this is a genuine transition into
            // idle, not a preemption decision.
            *kernel.running.write(&tok) = None;
            drop(tok);
            P::idle_loop();
        }
        Some((_, next)) => next,
    };
    kernel.ready.write(&tok).pop_highest();

    if prev_runnable {
        let p = prev.expect("prev_runnable implies prev is Some");
        let prev_td = kernel.task(p).write(&tok);
        prev_td.state = TaskState::Ready;
        let prio = prev_td.current_priority;
        kernel.ready.write(&tok).insert(prio, p);
    }
    let next_td = kernel.task(next).write(&tok);
    let next_fresh = next_td.fresh_start;
    next_td.fresh_start = false;
    next_td.state = TaskState::Running;
    *kernel.running.write(&tok) = Some(next);

    // PostTaskHook/PreTaskHook straddle every dispatch: Post for whatever
    // task is giving up the CPU (if any was actually running), Pre for
    // whatever task is about to start running, in that order.
    let post_task = kernel.cfg.hooks.post_task;
    let pre_task = kernel.cfg.hooks.pre_task;
    drop(tok);
    if prev.is_some() {
        if let Some(hook) = post_task {
            hook();
        }
    }
    if let Some(hook) = pre_task {
        hook();
    }
    match prev {
        Some(p) if prev_needs_save => P::dispatch(p, next, next_fresh),
        _ => P::switch_away(next, next_fresh),
    }
}

/// `ActivateTask`.
pub fn activate_task<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(task_id.index() < kernel.cfg.tasks.len(), StatusType::Id);
        activate_internal(kernel, &tok, task_id)
    })();
    dispatch::report(kernel, &tok, ServiceId::ActivateTask, &result);
    reschedule(kernel, tok);
    result
}

/// `TerminateTask`: always terminates the calling task. Must be called
/// from task context (not an ISR), and the caller must not be holding any
/// resources.
pub fn terminate_task<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(!kernel.in_isr(&tok), StatusType::CallLevel);
        let current = kernel
            .running
            .read(&tok)
            .expect("TerminateTask called with no running task");
        dispatch::check!(
            kernel.task(current).read(&tok).holders_len() == 0,
            StatusType::Resource
        );
        terminate_internal(kernel, &tok, current);
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::TerminateTask, &result);
    reschedule(kernel, tok);
    result
}

/// `ChainTask(task_id)`: atomically terminate the calling task and
/// activate `task_id`.
///
/// For a different target, activation is attempted before the caller is
/// torn down — `ChainTask` must not terminate the caller if the target
/// can't accept another activation (OSEK OS 2.2.3 §8.3: "the calling
/// task is not terminated" on `E_OS_LIMIT`). For `task_id == self`,
/// activation and termination are accounting for the *same* task's
/// activation count, and checking "is there room for one more" against
/// the still-running instance would reject a chain-to-self that is
/// only actually queuing a replacement for the slot about to be freed —
/// so the caller is terminated (freeing its slot) before the
/// self-activation is evaluated, letting it reclaim that slot rather
/// than need one beyond it.
pub fn chain_task<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(!kernel.in_isr(&tok), StatusType::CallLevel);
        dispatch::check!(task_id.index() < kernel.cfg.tasks.len(), StatusType::Id);
        let current = kernel
            .running
            .read(&tok)
            .expect("ChainTask called with no running task");
        dispatch::check!(
            kernel.task(current).read(&tok).holders_len() == 0,
            StatusType::Resource
        );
        if task_id == current {
            terminate_internal(kernel, &tok, current);
            activate_internal(kernel, &tok, task_id).expect(
                "chaining a task into itself can't exceed max_activations: \
                 terminate_internal just freed the slot activate_internal reclaims",
            );
        } else {
            activate_internal(kernel, &tok, task_id)?;
            terminate_internal(kernel, &tok, current);
        }
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::ChainTask, &result);
    reschedule(kernel, tok);
    result
}

/// `Schedule()`: an explicit, voluntary dispatch point for non-preemptable
/// tasks. Unlike the implicit dispatch points every other service passes
/// through, this one also yields to equal-priority READY tasks.
pub fn schedule<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(!kernel.in_isr(&tok), StatusType::CallLevel);
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::Schedule, &result);
    if result.is_ok() {
        reschedule_cooperative(kernel, tok);
    } else {
        drop(tok);
    }
    result
}

/// `GetTaskID`: the currently running task, or `None` if called with
/// nothing running (from a tick ISR that fired while the system was
/// idle, for instance).
pub fn get_task_id<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) -> Option<TaskId> {
    let tok = Critical::enter::<P>();
    *kernel.running.read(&tok)
}

/// `GetTaskState`.
pub fn get_task_state<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    task_id: TaskId,
) -> Result<TaskState> {
    let tok = Critical::enter::<P>();
    let result: Result<TaskState> = (|| {
        dispatch::check!(task_id.index() < kernel.cfg.tasks.len(), StatusType::Id);
        Ok(kernel.task(task_id).read(&tok).state)
    })();
    dispatch::report(kernel, &tok, ServiceId::GetTaskState, &result);
    result
}
