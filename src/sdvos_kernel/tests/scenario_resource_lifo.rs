//! spec.md section 8, scenario 5 (resource LIFO violation): holding R1
//! then R2 and attempting to release R1 out of order must fail with
//! `E_OS_NOFUNC` and leave the holder stack untouched — R1 and R2 both
//! still held, in the same order, afterward.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use sdvos::config;
use sdvos::{AppMode, Hooks, ResourceId, Schedulability, StaticConfig, StatusType, TaskState};
use sdvos_port_std::StdPlatform;

const RES_R1: ResourceId = ResourceId::new(0);
const RES_R2: ResourceId = ResourceId::new(1);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 2;

static TASK_CFGS: [sdvos::TaskCfg; 1] =
    [config::basic_task(1, Schedulability::Preemptable, 1, worker_entry)];

static RESOURCE_CFGS: [sdvos::ResourceCfg; 2] = [config::resource(1), config::resource(1)];

static AUTOSTART: [&[sdvos::TaskId]; 1] = [&[sdvos::TaskId::new(0)]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &TASK_CFGS,
    resources: &RESOURCE_CFGS,
    counters: &[],
    alarms: &[],
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 1] = [sdvos::KCell::new(sdvos::TaskDyn::new())];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 2] =
    [sdvos::KCell::new(sdvos::ResourceDyn::new()); 2];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 0] = [];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 0] = [];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

// Set only once every assertion in `worker_entry` has actually passed: a
// failed assertion panics that task's own OS thread without touching the
// test's own, so this flag (rather than just "the test didn't hang") is
// what lets the test thread notice a broken invariant.
static REACHED_END: AtomicBool = AtomicBool::new(false);

fn worker_entry() {
    sdvos::get_resource(&KERNEL, RES_R1).expect("GetResource(R1) succeeds");
    sdvos::get_resource(&KERNEL, RES_R2).expect("GetResource(R2) succeeds");

    assert_eq!(
        sdvos::release_resource(&KERNEL, RES_R1),
        Err(StatusType::NoFunc),
        "releasing R1 while R2 (acquired later) is still held violates LIFO order"
    );

    // Neither resource's holder bookkeeping moved: R2 is still the top of
    // the stack and must be released first.
    sdvos::release_resource(&KERNEL, RES_R2).expect("R2 is still on top, releases cleanly");
    sdvos::release_resource(&KERNEL, RES_R1).expect("R1 is now on top, releases cleanly");

    REACHED_END.store(true, Ordering::SeqCst);
    let _ = sdvos::terminate_task(&KERNEL);
}

fn tick() {}

#[test]
fn release_resource_out_of_lifo_order_fails_and_state_is_unchanged() {
    sdvos_port_std::init(&[worker_entry], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));

    common::settle();

    assert!(REACHED_END.load(Ordering::SeqCst));
    assert_eq!(
        sdvos::get_task_state(&KERNEL, sdvos::TaskId::new(0)).unwrap(),
        TaskState::Suspended
    );
}
