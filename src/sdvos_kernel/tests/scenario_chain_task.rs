//! spec.md section 8, scenario 4 (ChainTask re-queue).
//!
//! B has `max_activations = 2`. While B's first instance is running it
//! calls `ActivateTask(B)` (queuing a second instance) and then
//! `ChainTask(B)` — chaining into itself. `ChainTask` terminates the
//! caller before evaluating the self-activation, so the activation
//! reclaims the slot just freed rather than needing one beyond it: the
//! chain succeeds, leaving one queued activation behind it (the second
//! instance requested by the earlier `ActivateTask`). B then restarts
//! twice more via plain `TerminateTask` before finally going SUSPENDED,
//! for three task-body invocations in total.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use sdvos::config;
use sdvos::{AppMode, Hooks, Schedulability, StaticConfig, TaskId, TaskState};
use sdvos_port_std::StdPlatform;

const TASK_B: TaskId = TaskId::new(0);

const PRIOS: usize = 4;
const SLOTS: usize = 4;
const NEST: usize = 0;

static TASK_CFGS: [sdvos::TaskCfg; 1] =
    [config::basic_task(1, Schedulability::Preemptable, 2, b_entry)];

static AUTOSTART: [&[TaskId]; 1] = [&[TASK_B]];

static CONFIG: StaticConfig = StaticConfig {
    tasks: &TASK_CFGS,
    resources: &[],
    counters: &[],
    alarms: &[],
    autostart: &AUTOSTART,
    hooks: Hooks::NONE,
    sys_counter: 0,
};

static TASKS: [sdvos::KCell<sdvos::TaskDyn<NEST>>; 1] = [sdvos::KCell::new(sdvos::TaskDyn::new())];
static RESOURCES: [sdvos::KCell<sdvos::ResourceDyn>; 0] = [];
static COUNTERS: [sdvos::KCell<sdvos::CounterDyn>; 0] = [];
static ALARMS: [sdvos::KCell<sdvos::AlarmDyn>; 0] = [];

static KERNEL: sdvos::Kernel<StdPlatform, PRIOS, SLOTS, NEST> =
    sdvos::Kernel::new(&CONFIG, &TASKS, &RESOURCES, &COUNTERS, &ALARMS);

static RUN_COUNT: AtomicU32 = AtomicU32::new(0);

fn b_entry() {
    let run = RUN_COUNT.fetch_add(1, Ordering::SeqCst) + 1;
    match run {
        1 => {
            sdvos::activate_task(&KERNEL, TASK_B).expect("ActivateTask(B) queues one instance");
            sdvos::chain_task(&KERNEL, TASK_B)
                .expect("chaining B into itself reclaims the slot it just freed");
        }
        2 => {
            let _ = sdvos::terminate_task(&KERNEL);
        }
        _ => {
            let _ = sdvos::terminate_task(&KERNEL);
        }
    }
}

fn tick() {}

#[test]
fn chain_task_into_self_requeues_without_exceeding_max_activations() {
    sdvos_port_std::init(&[b_entry], tick);
    std::thread::spawn(|| sdvos::start_os(&KERNEL, AppMode(0)));

    common::settle_for(Duration::from_millis(200));

    assert_eq!(RUN_COUNT.load(Ordering::SeqCst), 3);
    assert_eq!(
        sdvos::get_task_state(&KERNEL, TASK_B).unwrap(),
        TaskState::Suspended
    );
}
