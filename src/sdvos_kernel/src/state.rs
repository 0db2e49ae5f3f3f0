//! The `Kernel` singleton: static, `'static` configuration plus the
//! parallel mutable state arrays, one entry per object id, that track
//! everything that actually changes at runtime.

use core::marker::PhantomData;

use arrayvec::ArrayVec;
use sdvos_core::{
    klock::{Critical, KCell},
    AppMode, EventMask, OsError, Platform, StaticConfig, TaskId, TaskState,
};

use crate::readyqueue::ReadyQueue;

/// One held resource, as pushed onto a task's holder stack by
/// `GetResource`. Resources must be released in exactly the reverse order
/// they were acquired; the stack shape is what makes that cheap to check.
#[derive(Clone, Copy)]
pub(crate) struct HeldResource {
    pub(crate) resource: usize,
    pub(crate) saved_priority: u8,
}

/// A task's dynamic state.
///
/// `NEST` bounds the resource-holder stack depth; it must be at least the
/// deepest resource nesting found in the static configuration, which is a
/// config-generator invariant, not one the kernel itself can check without
/// a config validation pass (out of scope here — see the configuration
/// generator boundary noted in `DESIGN.md`).
pub struct TaskDyn<const NEST: usize> {
    pub(crate) current_priority: u8,
    pub(crate) state: TaskState,
    pub(crate) pending_activations: u8,
    pub(crate) event_pending: EventMask,
    pub(crate) event_wait: EventMask,
    pub(crate) holders: ArrayVec<HeldResource, NEST>,
    /// Set whenever this task is handed a brand new activation instance
    /// (the SUSPENDED -> READY transition in `activate_internal`, or the
    /// queued-reactivation case in `terminate_internal`) and cleared the
    /// moment the scheduler actually dispatches it in. A task resumed from
    /// `WaitEvent` or from being preempted never has this set, since
    /// those are the same instance continuing, not a new one.
    pub(crate) fresh_start: bool,
}

impl<const NEST: usize> TaskDyn<NEST> {
    pub const fn new() -> Self {
        Self {
            current_priority: 0,
            state: TaskState::Suspended,
            pending_activations: 0,
            event_pending: EventMask::NONE,
            event_wait: EventMask::NONE,
            holders: ArrayVec::new(),
            fresh_start: true,
        }
    }

    pub(crate) fn push_holder(&mut self, resource: usize, saved_priority: u8) {
        self.holders
            .try_push(HeldResource {
                resource,
                saved_priority,
            })
            .expect("resource nesting depth exceeds the configured maximum");
    }

    pub(crate) fn top_holder(&self) -> Option<HeldResource> {
        self.holders.last().copied()
    }

    pub(crate) fn pop_holder(&mut self) -> Option<HeldResource> {
        self.holders.pop()
    }

    pub(crate) fn holders_len(&self) -> usize {
        self.holders.len()
    }
}

/// A resource's dynamic state.
#[derive(Clone, Copy)]
pub struct ResourceDyn {
    /// The task currently holding this resource, if any.
    pub(crate) holder: Option<TaskId>,
}

impl ResourceDyn {
    pub const fn new() -> Self {
        Self { holder: None }
    }
}

/// A counter's dynamic state.
#[derive(Clone, Copy)]
pub struct CounterDyn {
    pub(crate) value: u32,
}

impl CounterDyn {
    pub const fn new() -> Self {
        Self { value: 0 }
    }
}

/// An alarm's dynamic state.
#[derive(Clone, Copy)]
pub struct AlarmDyn {
    pub(crate) armed: bool,
    pub(crate) expiry: u32,
    pub(crate) cycle: u32,
}

impl AlarmDyn {
    pub const fn new() -> Self {
        Self {
            armed: false,
            expiry: 0,
            cycle: 0,
        }
    }
}

/// The execution context the call-level checks consult: whether the
/// caller is a task or running inside an ISR. Most services restrict
/// which of these two contexts may call them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ExecContext {
    Task,
    Isr,
}

/// The kernel singleton.
///
/// `PRIOS`/`SLOTS` size the ready queue (see [`crate::readyqueue`]); `NEST`
/// bounds per-task resource nesting. Everything else (task/resource/
/// counter/alarm counts) is simply the length of the slices the
/// application provides.
pub struct Kernel<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize> {
    pub(crate) cfg: &'static StaticConfig,
    pub(crate) tasks: &'static [KCell<TaskDyn<NEST>>],
    pub(crate) resources: &'static [KCell<ResourceDyn>],
    pub(crate) counters: &'static [KCell<CounterDyn>],
    pub(crate) alarms: &'static [KCell<AlarmDyn>],
    pub(crate) ready: KCell<ReadyQueue<PRIOS, SLOTS>>,
    pub(crate) running: KCell<Option<TaskId>>,
    pub(crate) exec_ctx: KCell<ExecContext>,
    pub(crate) app_mode: KCell<Option<AppMode>>,
    pub(crate) last_error: KCell<Option<OsError>>,
    /// ISR nesting depth (`0` when no Category-2 ISR is active anywhere on
    /// the nesting stack). Transitions `exec_ctx` at `0 -> 1`/`1 -> 0`.
    pub(crate) isr_depth: KCell<usize>,
    /// `SuspendOSInterrupts`/`ResumeOSInterrupts` nesting depth, tracked
    /// independently of `SuspendAllInterrupts` so mismatched pairing of
    /// the two OSEK APIs is at least structurally distinguishable.
    pub(crate) os_interrupt_depth: KCell<usize>,
    /// `SuspendAllInterrupts`/`ResumeAllInterrupts` nesting depth.
    pub(crate) all_interrupt_depth: KCell<usize>,
    _platform: PhantomData<P>,
}

impl<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>
    Kernel<P, PRIOS, SLOTS, NEST>
{
    pub const fn new(
        cfg: &'static StaticConfig,
        tasks: &'static [KCell<TaskDyn<NEST>>],
        resources: &'static [KCell<ResourceDyn>],
        counters: &'static [KCell<CounterDyn>],
        alarms: &'static [KCell<AlarmDyn>],
    ) -> Self {
        Self {
            cfg,
            tasks,
            resources,
            counters,
            alarms,
            ready: KCell::new(ReadyQueue::new()),
            running: KCell::new(None),
            exec_ctx: KCell::new(ExecContext::Task),
            app_mode: KCell::new(None),
            last_error: KCell::new(None),
            isr_depth: KCell::new(0),
            os_interrupt_depth: KCell::new(0),
            all_interrupt_depth: KCell::new(0),
            _platform: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn task(&self, id: TaskId) -> &KCell<TaskDyn<NEST>> {
        &self.tasks[id.index()]
    }

    #[inline]
    pub(crate) fn resource(&self, id: sdvos_core::ResourceId) -> &KCell<ResourceDyn> {
        &self.resources[id.index()]
    }

    #[inline]
    pub(crate) fn counter(&self, id: sdvos_core::CounterId) -> &KCell<CounterDyn> {
        &self.counters[id.index()]
    }

    #[inline]
    pub(crate) fn alarm(&self, id: sdvos_core::AlarmId) -> &KCell<AlarmDyn> {
        &self.alarms[id.index()]
    }

    /// `true` if the caller is executing in an ISR.
    pub(crate) fn in_isr(&self, tok: &Critical) -> bool {
        *self.exec_ctx.read(tok) == ExecContext::Isr
    }
}
