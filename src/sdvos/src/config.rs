//! `const fn` builder helpers for the static object tables
//! [`sdvos_kernel::Kernel`] consumes.
//!
//! There is no parser and no allocation here: every table an application
//! declares is a `static` array of the descriptor types in
//! [`sdvos_core::object`], assembled with the helpers below at compile
//! time. This module is the target a build-time OIL-like generator would
//! emit into; by hand, it is also how `demos/blink` and `sdvos_kernel`'s
//! own integration tests declare their configurations.

use sdvos_core::{
    AlarmAction, AlarmAutostart, AlarmCfg, CounterCfg, CounterId, EventMask, ResourceCfg,
    Schedulability, TaskCfg, TaskKind,
};

/// Combine a handful of [`sdvos_core::AppMode`] indices into the bitmask
/// `AlarmAutostart`'s `modes` field expects.
pub const fn modes(indices: &[u8]) -> u8 {
    let mut mask = 0u8;
    let mut i = 0;
    while i < indices.len() {
        mask |= 1 << indices[i];
        i += 1;
    }
    mask
}

/// A basic task: runs to completion, may be queued for up to
/// `max_activations` pending activations, never calls `WaitEvent`.
///
/// Which application modes auto-start a task is declared once, on
/// [`crate::StaticConfig::autostart`]'s per-mode task lists, rather than
/// duplicated here on the task itself.
pub const fn basic_task(
    priority: u8,
    schedulability: Schedulability,
    max_activations: u8,
    entry: fn(),
) -> TaskCfg {
    TaskCfg {
        priority,
        kind: TaskKind::Basic,
        schedulability,
        max_activations,
        entry,
        event_mask: EventMask::NONE,
    }
}

/// An extended task: may block in `WaitEvent` on the bits of `event_mask`,
/// and is never queued for more than one pending activation.
pub const fn extended_task(
    priority: u8,
    schedulability: Schedulability,
    entry: fn(),
    event_mask: EventMask,
) -> TaskCfg {
    TaskCfg {
        priority,
        kind: TaskKind::Extended,
        schedulability,
        max_activations: 1,
        entry,
        event_mask,
    }
}

/// A resource with the given Immediate Priority Ceiling. The ceiling must
/// be at least the static priority of every task that ever
/// `GetResource`s it — a config-generator invariant this builder has no
/// way to check on its own, since it sees one descriptor at a time.
pub const fn resource(ceiling: u8) -> ResourceCfg {
    ResourceCfg { ceiling }
}

/// A counter. `ticks_per_base` lets an application declare alarms in
/// application-defined "base" units (e.g. milliseconds) even when the
/// counter itself is tied to a faster hardware tick.
pub const fn counter(max_allowed_value: u32, ticks_per_base: u32, min_cycle: u32) -> CounterCfg {
    CounterCfg {
        max_allowed_value,
        ticks_per_base,
        min_cycle,
    }
}

/// An alarm that is never armed automatically; some task or hook must
/// call `SetRelAlarm`/`SetAbsAlarm` itself.
pub const fn alarm(counter: CounterId, action: AlarmAction) -> AlarmCfg {
    AlarmCfg {
        counter,
        action,
        autostart: AlarmAutostart::Never,
    }
}

/// An alarm armed at `StartOS` to fire `increment` ticks after boot, then
/// every `cycle` ticks (`cycle == 0` for one-shot), in the given modes.
pub const fn autostart_alarm_relative(
    counter: CounterId,
    action: AlarmAction,
    increment: u32,
    cycle: u32,
    autostart_modes: u8,
) -> AlarmCfg {
    AlarmCfg {
        counter,
        action,
        autostart: AlarmAutostart::Relative {
            increment,
            cycle,
            modes: autostart_modes,
        },
    }
}
