//! The "Blink" scenario: two alarms bound to the hardware tick, each
//! activating a task that logs a toggle and terminates. Run for 2000
//! ticks (2 real seconds, at the port's 1ms tick period) and task1 has
//! toggled four times (500, 1000, 1500, 2000) while task2 has toggled
//! twice (1000, 2000) — six observable transitions in the interleaving
//! the scheduler's priority and FIFO tie-break rules produce.
//!
//! Run with `RUST_LOG=info` to see each toggle as it happens.

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
    let n = TASK1_TOGGLES.fetch_add(1, Ordering::SeqCst) + 1;
    let tick = sdvos::get_counter_value(&KERNEL, SYS_COUNTER).unwrap_or(0);
    log::info!("task1 toggle #{n} at tick {tick}");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn task2_entry() {
    let n = TASK2_TOGGLES.fetch_add(1, Ordering::SeqCst) + 1;
    let tick = sdvos::get_counter_value(&KERNEL, SYS_COUNTER).unwrap_or(0);
    log::info!("task2 toggle #{n} at tick {tick}");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn tick() {
    sdvos::tick_handler(&KERNEL);
}

fn main() {
    env_logger::init();

    sdvos_port_std::init(&[task1_entry, task2_entry], tick);

    std::thread::spawn(|| {
        std::thread::sleep(Duration::from_millis(2100));
        log::info!(
            "after 2000 ticks: task1 toggled {} times, task2 toggled {} times",
            TASK1_TOGGLES.load(Ordering::SeqCst),
            TASK2_TOGGLES.load(Ordering::SeqCst),
        );
        std::process::exit(0);
    });

    sdvos::start_os(&KERNEL, AppMode(0));
}
