//! spec.md section 8, scenario 3 (event wait): an extended task E blocks
//! in `WaitEvent(0x2)`. Setting only bit 0x1 leaves it WAITING; setting
//! 0x2 wakes it and, since E outranks the setter, preempts the setter.
//! `GetEvent` then reports both bits pending, and `ClearEvent(0x2)` in E
//! leaves 0x1 behind.

mod common;

use std::time::Duration;

use sdvos::config;
use sdvos::{AppMode, EventMask, Hooks, Schedulability, StaticConfig, TaskId};
use sdvos_port_std::StdPlatform;

use common::Trace;

const TASK_SETTER: TaskId = TaskId::new(0);
const TASK_E: TaskId = TaskId::new(1);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 0;

static TASK_CFGS: [sdvos::TaskCfg; 2] = [
    config::basic_task(1, Schedulability::Preemptable, 1, setter_entry),
    config::extended_task(2, Schedulability::Preemptable, e_entry, EventMask::EVENT_1),
];

static AUTOSTART: [&[TaskId]; 1] = [&[TASK_E, TASK_SETTER]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &TASK_CFGS,
    resources: &[],
    counters: &[],
    alarms: &[],
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 2] =
    [sdvos::KCell::new(sdvos::TaskDyn::new()); 2];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 0] = [];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 0] = [];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 0] = [];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

static TRACE: Trace = Trace::new();

fn e_entry() {
    TRACE.push("E-waiting");
    sdvos::wait_event(&KERNEL, EventMask::EVENT_1).expect("E can WaitEvent");
    TRACE.push("E-woken");

    let pending = sdvos::get_event(&KERNEL, TASK_E).expect("GetEvent succeeds");
    assert_eq!(pending, EventMask::EVENT_0.union(EventMask::EVENT_1));

    sdvos::clear_event(&KERNEL, EventMask::EVENT_1).expect("ClearEvent succeeds");
    let remaining = sdvos::get_event(&KERNEL, TASK_E).expect("GetEvent succeeds");
    assert_eq!(remaining, EventMask::EVENT_0);

    let _ = sdvos::terminate_task(&KERNEL);
}

fn setter_entry() {
    // E (priority 2) is already WAITING by the time this lower-priority
    // task gets a turn. Setting an event E isn't waiting on must not wake
    // it.
    sdvos::set_event(&KERNEL, TASK_E, EventMask::EVENT_0).expect("SetEvent(0x1) succeeds");
    assert_eq!(
        sdvos::get_task_state(&KERNEL, TASK_E).unwrap(),
        sdvos::TaskState::Waiting
    );
    TRACE.push("setter-after-0x1");

    // Setting the bit E actually waits on wakes it and, because E now
    // outranks this task, preempts it immediately.
    sdvos::set_event(&KERNEL, TASK_E, EventMask::EVENT_1).expect("SetEvent(0x2) succeeds");
    TRACE.push("setter-resumed-after-0x2");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn tick() {}

#[test]
fn set_event_wakes_only_on_matching_bits_and_preempts() {
    sdvos_port_std::init(&[setter_entry, e_entry], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));

    common::settle_for(Duration::from_millis(200));

    assert_eq!(
        TRACE.snapshot(),
        vec![
            "E-waiting",
            "setter-after-0x1",
            "E-woken",
            "setter-resumed-after-0x2",
        ]
    );
}
