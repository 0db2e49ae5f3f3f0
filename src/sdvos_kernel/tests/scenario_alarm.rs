//! spec.md section 8, scenario 6 (alarm one-shot vs cyclic): a one-shot
//! alarm fires exactly once and then reports `E_OS_NOFUNC` from
//! `GetAlarm`, while a cyclic alarm keeps firing every `cycle` ticks.
//!
//! `SetRelAlarm` is defined relative to the counter's value at the moment
//! of the call, so arming both alarms from the test's own thread (rather
//! than from a task) needs no synchronization with the tick signal: there
//! is no boot-time race to win.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use sdvos::config;
use sdvos::{AlarmAction, AlarmId, AppMode, CounterId, Hooks, StaticConfig};
use sdvos_port_std::StdPlatform;

const SYS_COUNTER: CounterId = CounterId::new(0);
const ALARM_ONESHOT: AlarmId = AlarmId::new(0);
const ALARM_CYCLIC: AlarmId = AlarmId::new(1);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 0;

static COUNTER_CFGS: [sdvos::CounterCfg; 1] = [config::counter(0xFFFF_FFFF, 1, 1)];

static ALARM_CFGS: [sdvos::AlarmCfg; 2] = [
    config::alarm(SYS_COUNTER, AlarmAction::Callback(oneshot_fired)),
    config::alarm(SYS_COUNTER, AlarmAction::Callback(cyclic_fired)),
];

static AUTOSTART: [&[sdvos::TaskId]; 1] = [&[]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &[],
    resources: &[],
    counters: &COUNTER_CFGS,
    alarms: &ALARM_CFGS,
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 0] = [];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 0] = [];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 1] =
    [sdvos::KCell::new(sdvos::CounterDyn::new())];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 2] = [sdvos::KCell::new(sdvos::AlarmDyn::new()); 2];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

static ONESHOT_FIRES: AtomicU32 = AtomicU32::new(0);
static CYCLIC_FIRES: AtomicU32 = AtomicU32::new(0);

fn oneshot_fired() {
    ONESHOT_FIRES.fetch_add(1, Ordering::SeqCst);
}

fn cyclic_fired() {
    CYCLIC_FIRES.fetch_add(1, Ordering::SeqCst);
}

fn tick() {
    sdvos::tick_handler(&KERNEL);
}

#[test]
fn one_shot_alarm_fires_once_cyclic_alarm_keeps_firing() {
    sdvos_port_std::init(&[], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));
    common::settle();

    sdvos::set_rel_alarm(&KERNEL, ALARM_ONESHOT, 10, 0).expect("one-shot SetRelAlarm succeeds");
    sdvos::set_rel_alarm(&KERNEL, ALARM_CYCLIC, 10, 50).expect("cyclic SetRelAlarm succeeds");

    // Fires expected at +10, +60, +110, +160, +210, +260 within this
    // window; allow a couple of missed edges for host scheduling jitter
    // without masking a real regression in the cycle arithmetic.
    common::settle_for(Duration::from_millis(305));

    assert_eq!(ONESHOT_FIRES.load(Ordering::SeqCst), 1);
    assert!(CYCLIC_FIRES.load(Ordering::SeqCst) >= 5);

    assert_eq!(
        sdvos::get_alarm(&KERNEL, ALARM_ONESHOT),
        Err(sdvos::StatusType::NoFunc)
    );
    assert!(sdvos::get_alarm(&KERNEL, ALARM_CYCLIC).is_ok());
}
