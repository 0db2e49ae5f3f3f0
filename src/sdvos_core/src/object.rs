//! Static object descriptors.
//!
//! Descriptors are immutable — they are the "static attributes" half of each
//! entity in the data model. The matching "dynamic state" half lives in
//! `sdvos_kernel::state`, in a parallel array indexed by the same [`Id`].

use crate::events::EventMask;
use crate::id::{CounterId, TaskId};

/// A task that runs to completion versus one that may block in `WaitEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// May never call `WaitEvent`; may be queued for multiple activations.
    Basic,
    /// May block in `WaitEvent`; at most one pending activation.
    Extended,
}

/// Whether a task's static schedulability lets other tasks preempt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedulability {
    Preemptable,
    NonPreemptable,
}

/// A task's dynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Suspended,
    Ready,
    Running,
    Waiting,
}

/// The static attributes of a task.
#[derive(Clone, Copy)]
pub struct TaskCfg {
    /// Static priority, `0` lowest. Must be `< Kernel`'s configured number
    /// of priority levels.
    pub priority: u8,
    pub kind: TaskKind,
    pub schedulability: Schedulability,
    /// Basic tasks may be queued for up to this many pending activations.
    /// Always `1` for extended tasks; the kernel does not check this here,
    /// it is a config-generator invariant.
    pub max_activations: u8,
    /// Task body. Resumed with an empty stack on every (re-)activation.
    pub entry: fn(),
    /// Bits of [`EventMask`] this task (if extended) is permitted to use.
    /// Informational only — not enforced at runtime, since which bits are
    /// "declared" is a build-time config-generator concern.
    pub event_mask: EventMask,
}

/// The static attributes of a resource.
#[derive(Clone, Copy)]
pub struct ResourceCfg {
    /// The maximum static priority of any task that statically accesses
    /// this resource — the Immediate Priority Ceiling.
    pub ceiling: u8,
}

/// What an alarm does when it fires.
#[derive(Clone, Copy)]
pub enum AlarmAction {
    ActivateTask(TaskId),
    SetEvent(TaskId, EventMask),
    /// Runs in the context of the tick ISR; must not call blocking or
    /// scheduling services.
    Callback(fn()),
}

/// Whether an alarm is armed by the config generator itself at `StartOS`,
/// rather than by an explicit `SetRelAlarm`/`SetAbsAlarm` call from
/// application code, and if so in which application modes.
#[derive(Clone, Copy)]
pub enum AlarmAutostart {
    /// Never armed automatically; some task or hook must call
    /// `SetRelAlarm`/`SetAbsAlarm` itself.
    Never,
    /// Armed relative to the bound counter's value at boot (`StartOS`
    /// itself is the `now` the increment is relative to).
    Relative {
        increment: u32,
        cycle: u32,
        /// Bitmask of `AppMode::0` indices this alarm is autostarted in.
        modes: u8,
    },
    /// Armed to the bound counter's absolute value.
    Absolute {
        start: u32,
        cycle: u32,
        modes: u8,
    },
}

/// The static attributes of an alarm.
#[derive(Clone, Copy)]
pub struct AlarmCfg {
    pub counter: CounterId,
    pub action: AlarmAction,
    pub autostart: AlarmAutostart,
}

/// The static attributes of a counter.
#[derive(Clone, Copy)]
pub struct CounterCfg {
    /// The counter wraps modulo `max_allowed_value + 1`.
    pub max_allowed_value: u32,
    pub ticks_per_base: u32,
    pub min_cycle: u32,
}
