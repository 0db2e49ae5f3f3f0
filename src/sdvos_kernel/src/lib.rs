//! SDVOS kernel core: the fixed-priority preemptive scheduler, priority
//! ceiling resource protocol, event-flag blocking, and counter/alarm
//! subsystem.
//!
//! Everything in this crate runs with the critical section
//! ([`sdvos_core::klock::Critical`]) held for its bookkeeping and is
//! `no_std`: the only things it assumes about the outside world are the
//! handful of primitives in [`sdvos_core::Platform`].
#![no_std]

mod dispatch;
mod event;
mod interrupts;
mod readyqueue;
mod resource;
mod startup;
mod state;
mod task;

pub mod counter;

pub use readyqueue::ReadyQueue;
pub use state::{AlarmDyn, CounterDyn, ExecContext, Kernel, ResourceDyn, TaskDyn};

pub use counter::{
    cancel_alarm, get_alarm, get_counter_value, get_elapsed_value, increment_counter,
    set_abs_alarm, set_rel_alarm, tick_handler,
};
pub use dispatch::last_error;
pub use event::{clear_event, get_event, set_event, wait_event};
pub use interrupts::{
    disable_all_interrupts, enable_all_interrupts, isr_enter, isr_exit, resume_all_interrupts,
    resume_os_interrupts, suspend_all_interrupts, suspend_os_interrupts,
};
pub use resource::{get_resource, release_resource};
pub use startup::{get_active_application_mode, shutdown_os, start_os};
pub use task::{
    activate_task, chain_task, get_task_id, get_task_state, schedule, terminate_task,
};
