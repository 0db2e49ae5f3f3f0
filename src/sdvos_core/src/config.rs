//! The static configuration the build-time generator would emit.
//!
//! `sdvos_kernel::Kernel` consumes exactly this struct, read-only, for the
//! lifetime of the process. Nothing in the kernel ever mutates a field of
//! `StaticConfig` — all runtime-mutable state lives in the parallel arrays
//! the kernel is separately given.

use crate::hooks::Hooks;
use crate::id::TaskId;
use crate::object::{AlarmCfg, CounterCfg, ResourceCfg, TaskCfg};

/// Bundles every static descriptor table an application declares.
///
/// Every slice here is produced by `const` evaluation in application code
/// (see `sdvos::config` for the builder helpers) — there is no parser, no
/// allocation, and no way to construct one of these at runtime.
pub struct StaticConfig {
    pub tasks: &'static [TaskCfg],
    pub resources: &'static [ResourceCfg],
    pub counters: &'static [CounterCfg],
    pub alarms: &'static [AlarmCfg],
    /// `autostart[mode.0 as usize]` lists the tasks auto-activated by
    /// `StartOS(mode)`.
    pub autostart: &'static [&'static [TaskId]],
    pub hooks: Hooks,
    /// Index into `counters` of the hardware-tied system counter advanced
    /// by the tick ISR.
    pub sys_counter: usize,
}
