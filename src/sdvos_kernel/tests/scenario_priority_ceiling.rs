//! spec.md section 8, scenario 2 (priority ceiling): while low-priority
//! task L holds resource R (ceiling = H's priority), activating M and H
//! does not preempt L. Releasing R lets H run before M, honoring both the
//! priority order and the immediate ceiling protocol's bounded-blocking
//! guarantee.

mod common;

use std::time::Duration;

use sdvos::config;
use sdvos::{AppMode, Hooks, Schedulability, StaticConfig, TaskId};
use sdvos_port_std::StdPlatform;

use common::Trace;

const TASK_L: TaskId = TaskId::new(0);
const TASK_M: TaskId = TaskId::new(1);
const TASK_H: TaskId = TaskId::new(2);
const RES_R: sdvos::ResourceId = sdvos::ResourceId::new(0);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 1;

static TASK_CFGS: [sdvos::TaskCfg; 3] = [
    config::basic_task(1, Schedulability::Preemptable, 1, task_l_entry),
    config::basic_task(2, Schedulability::Preemptable, 1, task_m_entry),
    config::basic_task(3, Schedulability::Preemptable, 1, task_h_entry),
];

static RESOURCE_CFGS: [sdvos::ResourceCfg; 1] = [config::resource(3)];

static AUTOSTART: [&[TaskId]; 1] = [&[TASK_L]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &TASK_CFGS,
    resources: &RESOURCE_CFGS,
    counters: &[],
    alarms: &[],
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 3] =
    [sdvos::KCell::new(sdvos::TaskDyn::new()); 3];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 1] =
    [sdvos::KCell::new(sdvos::ResourceDyn::new())];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 0] = [];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 0] = [];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

static TRACE: Trace = Trace::new();

fn task_l_entry() {
    TRACE.push("L-start");
    sdvos::get_resource(&KERNEL, RES_R).expect("L can acquire R");

    // M and H become READY while L is still running at R's ceiling; per
    // the immediate ceiling protocol neither may preempt L here.
    sdvos::activate_task(&KERNEL, TASK_M).expect("activating M succeeds");
    sdvos::activate_task(&KERNEL, TASK_H).expect("activating H succeeds");
    TRACE.push("L-still-running-after-activations");

    sdvos::release_resource(&KERNEL, RES_R).expect("L released R");
    // Control does not return here until L is the highest-priority READY
    // task again, i.e. after both H and M have run to completion.
    TRACE.push("L-resumed");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn task_m_entry() {
    TRACE.push("M");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn task_h_entry() {
    TRACE.push("H");
    let _ = sdvos::terminate_task(&KERNEL);
}

fn tick() {}

#[test]
fn resource_ceiling_defers_preemption_until_release() {
    sdvos_port_std::init(&[task_l_entry, task_m_entry, task_h_entry], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));

    common::settle_for(Duration::from_millis(200));

    assert_eq!(
        TRACE.snapshot(),
        vec![
            "L-start",
            "L-still-running-after-activations",
            "H",
            "M",
            "L-resumed",
        ]
    );
}
