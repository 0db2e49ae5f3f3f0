//! SDVOS: a static, dependable OSEK/VDX OS and AUTOSAR OS
//! service-subset conformant RTOS for deeply embedded ECUs.
//!
//! This is the facade application code is written against: it re-exports
//! [`sdvos_core`]'s object model and [`sdvos_kernel`]'s services under
//! one name, and adds [`config`], the `const fn` surface static
//! configurations are assembled with. A hosted application additionally
//! depends on `sdvos_port_std` for a [`sdvos_core::Platform`]
//! implementation; a target port supplies its own.
#![no_std]

pub mod config;

pub use sdvos_core::{
    AlarmAction, AlarmAutostart, AlarmCfg, AlarmId, AppMode, CounterCfg, CounterId, EventMask,
    Hooks, OsError, Platform, ResourceCfg, ResourceId, Schedulability, ServiceId, StaticConfig,
    StatusType, TaskCfg, TaskId, TaskKind, TaskState,
};
pub use sdvos_core::error::Result;
pub use sdvos_core::klock::{Critical, KCell};

pub use sdvos_kernel::{
    activate_task, cancel_alarm, chain_task, clear_event, disable_all_interrupts,
    enable_all_interrupts, get_active_application_mode, get_alarm, get_counter_value,
    get_elapsed_value, get_event, get_resource, get_task_id, get_task_state, increment_counter,
    isr_enter, isr_exit, last_error, release_resource, resume_all_interrupts,
    resume_os_interrupts, schedule, set_abs_alarm, set_event, set_rel_alarm, shutdown_os,
    start_os, suspend_all_interrupts, suspend_os_interrupts, terminate_task, tick_handler,
    AlarmDyn, CounterDyn, ExecContext, Kernel, ReadyQueue, ResourceDyn, TaskDyn,
};
