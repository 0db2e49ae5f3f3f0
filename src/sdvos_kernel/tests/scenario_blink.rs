//! spec.md section 8, scenario 1 ("Blink"): two periodic alarms on the
//! hardware tick, each activating a basic task that toggles an observable
//! counter and terminates. After 2000 ticks, task1 (500ms period) has
//! toggled four times and task2 (1000ms period) twice.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use sdvos::config;
use sdvos::{AlarmAction, AppMode, CounterId, Hooks, Schedulability, StaticConfig, TaskId};
use sdvos_port_std::StdPlatform;

const TASK1: TaskId = TaskId::new(0);
const TASK2: TaskId = TaskId::new(1);
const SYS_COUNTER: CounterId = CounterId::new(0);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 0;

static TASK_CFGS: [sdvos::TaskCfg; 2] = [
    config::basic_task(2, Schedulability::Preemptable, 1, task1_entry),
    config::basic_task(1, Schedulability::Preemptable, 1, task2_entry),
];

static COUNTER_CFGS: [sdvos::CounterCfg; 1] = [config::counter(0xFFFF_FFFF, 1, 1)];

static ALARM_CFGS: [sdvos::AlarmCfg; 2] = [
    config::autostart_alarm_relative(
        SYS_COUNTER,
        AlarmAction::ActivateTask(TASK1),
        500,
        500,
        config::modes(&[0]),
    ),
    config::autostart_alarm_relative(
        SYS_COUNTER,
        AlarmAction::ActivateTask(TASK2),
        1000,
        1000,
        config::modes(&[0]),
    ),
];

static AUTOSTART: [&[TaskId]; 1] = [&[]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &TASK_CFGS,
    resources: &[],
    counters: &COUNTER_CFGS,
    alarms: &ALARM_CFGS,
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 2] =
    [sdvos::KCell::new(sdvos::TaskDyn::new()); 2];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 0] = [];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 1] =
    [sdvos::KCell::new(sdvos::CounterDyn::new())];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 2] = [sdvos::KCell::new(sdvos::AlarmDyn::new()); 2];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

static TASK1_TOGGLES: AtomicU32 = AtomicU32::new(0);
static TASK2_TOGGLES: AtomicU32 = AtomicU32::new(0);

fn task1_entry() {
    TASK1_TOGGLES.fetch_add(1, Ordering::SeqCst);
    let _ = sdvos::terminate_task(&KERNEL);
}

fn task2_entry() {
    TASK2_TOGGLES.fetch_add(1, Ordering::SeqCst);
    let _ = sdvos::terminate_task(&KERNEL);
}

fn tick() {
    sdvos::tick_handler(&KERNEL);
}

#[test]
fn blink_toggles_at_the_expected_rate() {
    sdvos_port_std::init(&[task1_entry, task2_entry], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));

    // 2000 ticks at the 1ms tick period, plus slack for scheduling jitter.
    std::thread::sleep(Duration::from_millis(2100));

    assert_eq!(TASK1_TOGGLES.load(Ordering::SeqCst), 4);
    assert_eq!(TASK2_TOGGLES.load(Ordering::SeqCst), 2);
}
