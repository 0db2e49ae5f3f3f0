//! Application entry points: user-provided callbacks invoked at fixed
//! points of the kernel's lifecycle.
//!
//! Hooks are configuration-time function pointers, not trait objects: a
//! null/`None` field means "not configured", a plain function-pointer
//! field with a null sentinel rather than a heavier callback-registry
//! abstraction.

use crate::error::StatusType;

/// Selects the auto-start task set at `StartOS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppMode(pub u8);

/// User-provided callbacks invoked at fixed points of the kernel's
/// lifecycle.
#[derive(Clone, Copy)]
pub struct Hooks {
    pub startup: Option<fn()>,
    pub shutdown: Option<fn(StatusType)>,
    pub error: Option<fn(StatusType)>,
    pub pre_task: Option<fn()>,
    pub post_task: Option<fn()>,
}

impl Hooks {
    /// A configuration with every hook left unset.
    pub const NONE: Self = Self {
        startup: None,
        shutdown: None,
        error: None,
        pre_task: None,
        post_task: None,
    };
}

impl Default for Hooks {
    fn default() -> Self {
        Self::NONE
    }
}
