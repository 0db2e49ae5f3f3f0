//! API surface for SDVOS, an OSEK/VDX OS and AUTOSAR OS service-subset
//! conformant real-time kernel for deeply embedded ECUs.
//!
//! This crate defines the parts of the system an application's static
//! configuration is built from — object descriptors, status codes, hook
//! signatures — and the [`Platform`] trait through which the kernel core in
//! [`sdvos_kernel`] is connected to a concrete architecture (or, for testing,
//! a hosted simulation). It contains no scheduling logic of its own.
#![no_std]

pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod id;
pub mod klock;
pub mod object;
pub mod platform;

pub use config::StaticConfig;
pub use error::{OsError, ServiceId, StatusType};
pub use events::EventMask;
pub use hooks::{AppMode, Hooks};
pub use id::{AlarmId, CounterId, ResourceId, TaskId};
pub use object::{
    AlarmAction, AlarmAutostart, AlarmCfg, CounterCfg, ResourceCfg, Schedulability, TaskCfg,
    TaskKind, TaskState,
};
pub use platform::Platform;
