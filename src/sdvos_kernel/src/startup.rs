//! `StartOS`/`ShutdownOS` and the application-mode accessor.

use sdvos_core::klock::Critical;
use sdvos_core::{AlarmAutostart, AppMode, Platform, StatusType};

use crate::counter::{set_abs_alarm, set_rel_alarm};
use crate::state::Kernel;
use crate::task::activate_internal;

/// `StartOS(mode)`: never returns.
///
/// Runs `StartupHook()`, arms every alarm configured to autostart in
/// `mode`, activates every task configured to autostart in `mode`,
/// enables interrupts, and falls into the scheduler. If no task ends up
/// READY (an empty autostart set, or one whose tasks immediately
/// terminate), control falls to [`Platform::idle_loop`].
pub fn start_os<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    mode: AppMode,
) -> ! {
    {
        let tok = Critical::enter::<P>();
        *kernel.app_mode.write(&tok) = Some(mode);
    }

    if let Some(hook) = kernel.cfg.hooks.startup {
        hook();
    }

    for (i, alarm_cfg) in kernel.cfg.alarms.iter().enumerate() {
        let alarm_id = sdvos_core::AlarmId::new(i);
        match alarm_cfg.autostart {
            AlarmAutostart::Never => {}
            AlarmAutostart::Relative {
                increment,
                cycle,
                modes,
            } => {
                if modes & (1 << mode.0) != 0 {
                    let _ = set_rel_alarm(kernel, alarm_id, increment, cycle);
                }
            }
            AlarmAutostart::Absolute { start, cycle, modes } => {
                if modes & (1 << mode.0) != 0 {
                    let _ = set_abs_alarm(kernel, alarm_id, start, cycle);
                }
            }
        }
    }

    {
        let tok = Critical::enter::<P>();
        let autostart = kernel
            .cfg
            .autostart
            .get(mode.0 as usize)
            .copied()
            .unwrap_or(&[]);
        for &task_id in autostart {
            let _ = activate_internal(kernel, &tok, task_id);
        }

        let next = kernel.ready.read(&tok).peek_highest();
        match next {
            Some((_, task_id)) => {
                kernel.ready.write(&tok).pop_highest();
                let task = kernel.task(task_id).write(&tok);
                task.state = sdvos_core::TaskState::Running;
                task.fresh_start = false;
                *kernel.running.write(&tok) = Some(task_id);
                drop(tok);
                P::interrupt_init();
                P::start(task_id);
            }
            None => {
                drop(tok);
                P::interrupt_init();
                P::idle_loop();
            }
        }
    }
}

/// `ShutdownOS(status)`: runs `ShutdownHook(status)` and halts.
pub fn shutdown_os<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    status: StatusType,
) -> ! {
    if let Some(hook) = kernel.cfg.hooks.shutdown {
        hook(status);
    }
    P::panic("ShutdownOS");
}

/// `GetActiveApplicationMode()`.
pub fn get_active_application_mode<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) -> Option<AppMode> {
    let tok = Critical::enter::<P>();
    *kernel.app_mode.read(&tok)
}
