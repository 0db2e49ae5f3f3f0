//! Counters and the alarms attached to them.
//!
//! A counter is a bounded, wrapping tick count; `IncrementCounter` (called
//! by a driver, or by [`tick_handler`] for the hardware-tied system
//! counter) advances it by exactly one and fires every alarm whose expiry
//! matches the new value, in the order alarms are declared in the static
//! configuration.

use sdvos_core::klock::Critical;
use sdvos_core::{
    error::Result, AlarmAction, AlarmId, CounterId, Platform, ServiceId, StatusType,
};

use crate::dispatch;
use crate::event::set_event;
use crate::state::Kernel;
use crate::task::{activate_internal, reschedule};

/// A counter's modulus, `MAXALLOWEDVALUE + 1` — computed in `u64` because
/// `MAXALLOWEDVALUE` may legitimately be `u32::MAX` (as `SYS_COUNTER`'s
/// typically is), and `u32::MAX + 1` does not fit back in a `u32`.
fn counter_range(max_allowed_value: u32) -> u64 {
    max_allowed_value as u64 + 1
}

/// Reduce `value` modulo a counter's range. Takes `value` as `u64` so
/// callers can add two counter-range values (e.g. an expiry plus a cycle)
/// without overflowing `u32` before the modulus is applied.
fn wrap(value: u64, max_allowed_value: u32) -> u32 {
    (value % counter_range(max_allowed_value)) as u32
}

/// Fire one alarm's configured action. Runs with the critical section
/// held; `Callback` bodies must be short and must not call blocking or
/// rescheduling services.
fn fire<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    tok: &Critical,
    alarm_id: AlarmId,
) {
    match kernel.cfg.alarms[alarm_id.index()].action {
        AlarmAction::ActivateTask(task_id) => {
            let _ = activate_internal(kernel, tok, task_id);
        }
        AlarmAction::SetEvent(task_id, mask) => {
            // set_event re-enters its own Critical and calls reschedule,
            // which is harmless (nested critical sections and a no-op
            // reschedule while we're still inside the tick ISR) but does
            // mean the call below re-derives `tok` rather than reusing it.
            drop(tok);
            let _ = set_event::<P, PRIOS, SLOTS, NEST>(kernel, task_id, mask);
        }
        AlarmAction::Callback(cb) => cb(),
    }
}

/// `IncrementCounter(counter_id)`.
pub fn increment_counter<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    counter_id: CounterId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(
            counter_id.index() < kernel.cfg.counters.len(),
            StatusType::Id
        );
        let max = kernel.cfg.counters[counter_id.index()].max_allowed_value;
        let new_value = {
            let cd = kernel.counter(counter_id).write(&tok);
            cd.value = wrap(cd.value as u64 + 1, max);
            cd.value
        };
        for (i, alarm_cfg) in kernel.cfg.alarms.iter().enumerate() {
            if alarm_cfg.counter != counter_id {
                continue;
            }
            let alarm_id = AlarmId::new(i);
            let should_fire = {
                let ad = kernel.alarm(alarm_id).read(&tok);
                ad.armed && ad.expiry == new_value
            };
            if !should_fire {
                continue;
            }
            {
                let ad = kernel.alarm(alarm_id).write(&tok);
                if ad.cycle > 0 {
                    ad.expiry = wrap(ad.expiry as u64 + ad.cycle as u64, max);
                } else {
                    ad.armed = false;
                }
            }
            fire(kernel, &tok, alarm_id);
        }
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::IncrementCounter, &result);
    reschedule(kernel, tok);
    result
}

/// Advance the hardware-tied system counter by one tick. This *is* the
/// platform's tick interrupt handler: it brackets itself in the
/// [`crate::interrupts::isr_enter`]/`isr_exit` trampoline so any alarm
/// action it fires (`ActivateTask`, `SetEvent`, a user `Callback`) runs
/// with the kernel correctly seeing ISR call-level, and so the dispatch
/// decision happens once, at `isr_exit`, rather than mid-tick.
pub fn tick_handler<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
) {
    crate::interrupts::isr_enter(kernel);
    let sys_counter = CounterId::new(kernel.cfg.sys_counter);
    let _ = increment_counter(kernel, sys_counter);
    crate::interrupts::isr_exit(kernel);
}

/// `GetCounterValue(counter_id)`.
pub fn get_counter_value<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    counter_id: CounterId,
) -> Result<u32> {
    let tok = Critical::enter::<P>();
    let result: Result<u32> = (|| {
        dispatch::check!(
            counter_id.index() < kernel.cfg.counters.len(),
            StatusType::Id
        );
        Ok(kernel.counter(counter_id).read(&tok).value)
    })();
    dispatch::report(kernel, &tok, ServiceId::GetCounterValue, &result);
    result
}

/// `GetElapsedValue(counter_id, since)`: ticks elapsed since a
/// previously-read value, plus the counter's current value (mirroring
/// the in/out `ValueRef` parameter of the OSEK signature as a single
/// returned pair rather than a by-reference argument).
pub fn get_elapsed_value<
    P: Platform,
    const PRIOS: usize,
    const SLOTS: usize,
    const NEST: usize,
>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    counter_id: CounterId,
    since: u32,
) -> Result<(u32, u32)> {
    let tok = Critical::enter::<P>();
    let result: Result<(u32, u32)> = (|| {
        dispatch::check!(
            counter_id.index() < kernel.cfg.counters.len(),
            StatusType::Id
        );
        let max = kernel.cfg.counters[counter_id.index()].max_allowed_value;
        let current = kernel.counter(counter_id).read(&tok).value;
        let range = counter_range(max);
        let since_n = wrap(since as u64, max) as u64;
        let elapsed = wrap(current as u64 + range - since_n, max);
        Ok((current, elapsed))
    })();
    dispatch::report(kernel, &tok, ServiceId::GetElapsedValue, &result);
    result
}

fn validate_alarm_values(max: u32, min_cycle: u32, value: u32, cycle: u32) -> Result<()> {
    if value == 0 || value > max {
        return Err(StatusType::Value);
    }
    if cycle != 0 && (cycle < min_cycle || cycle > max) {
        return Err(StatusType::Value);
    }
    Ok(())
}

/// `SetRelAlarm(alarm_id, increment, cycle)`: arms the alarm to fire
/// `increment` ticks from the attached counter's current value, then
/// every `cycle` ticks thereafter (`cycle == 0` disarms after firing
/// once).
pub fn set_rel_alarm<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    alarm_id: AlarmId,
    increment: u32,
    cycle: u32,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(alarm_id.index() < kernel.cfg.alarms.len(), StatusType::Id);
        dispatch::check!(
            !kernel.alarm(alarm_id).read(&tok).armed,
            StatusType::State
        );
        let counter_id = kernel.cfg.alarms[alarm_id.index()].counter;
        let cfg = &kernel.cfg.counters[counter_id.index()];
        dispatch::check!(
            validate_alarm_values(cfg.max_allowed_value, cfg.min_cycle, increment, cycle).is_ok(),
            StatusType::Value
        );
        let base = kernel.counter(counter_id).read(&tok).value;
        let ad = kernel.alarm(alarm_id).write(&tok);
        ad.armed = true;
        ad.expiry = wrap(base as u64 + increment as u64, cfg.max_allowed_value);
        ad.cycle = cycle;
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::SetRelAlarm, &result);
    result
}

/// `SetAbsAlarm(alarm_id, start, cycle)`: arms the alarm to fire when the
/// attached counter reaches the absolute value `start`.
pub fn set_abs_alarm<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    alarm_id: AlarmId,
    start: u32,
    cycle: u32,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(alarm_id.index() < kernel.cfg.alarms.len(), StatusType::Id);
        dispatch::check!(
            !kernel.alarm(alarm_id).read(&tok).armed,
            StatusType::State
        );
        let counter_id = kernel.cfg.alarms[alarm_id.index()].counter;
        let cfg = &kernel.cfg.counters[counter_id.index()];
        dispatch::check!(
            validate_alarm_values(cfg.max_allowed_value, cfg.min_cycle, start, cycle).is_ok(),
            StatusType::Value
        );
        let ad = kernel.alarm(alarm_id).write(&tok);
        ad.armed = true;
        ad.expiry = wrap(start as u64, cfg.max_allowed_value);
        ad.cycle = cycle;
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::SetAbsAlarm, &result);
    result
}

/// `CancelAlarm(alarm_id)`.
pub fn cancel_alarm<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    alarm_id: AlarmId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(alarm_id.index() < kernel.cfg.alarms.len(), StatusType::Id);
        let ad = kernel.alarm(alarm_id).write(&tok);
        dispatch::check!(ad.armed, StatusType::NoFunc);
        ad.armed = false;
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::CancelAlarm, &result);
    result
}

/// `GetAlarm(alarm_id)`: ticks remaining until the next expiry.
pub fn get_alarm<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    alarm_id: AlarmId,
) -> Result<u32> {
    let tok = Critical::enter::<P>();
    let result: Result<u32> = (|| {
        dispatch::check!(alarm_id.index() < kernel.cfg.alarms.len(), StatusType::Id);
        let ad = kernel.alarm(alarm_id).read(&tok);
        dispatch::check!(ad.armed, StatusType::NoFunc);
        let counter_id = kernel.cfg.alarms[alarm_id.index()].counter;
        let max = kernel.cfg.counters[counter_id.index()].max_allowed_value;
        let current = kernel.counter(counter_id).read(&tok).value;
        let range = counter_range(max);
        let current_n = wrap(current as u64, max) as u64;
        Ok(wrap(ad.expiry as u64 + range - current_n, max))
    })();
    dispatch::report(kernel, &tok, ServiceId::GetAlarm, &result);
    result
}
