//! OSEK status codes.

/// The result code returned by every SDVOS service call.
///
/// This mirrors OSEK OS's `StatusType`: a single flat 8-bit error space
/// shared by all services, rather than a per-service error enum. `E_OK` is
/// guaranteed to be zero so that `status as u8 == 0` can stand in for a
/// success check the way generated OSEK glue code expects.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    /// Normal return value.
    Ok = 0,
    /// Caller's priority is not high enough, or the object is not accessible
    /// from the caller's context (e.g. a basic task touching events).
    Access = 1,
    /// Service is not callable from the current execution context (e.g. an
    /// ISR calling `TerminateTask`).
    CallLevel = 2,
    /// Invalid object id.
    Id = 3,
    /// Activation limit or other counted resource exceeded.
    Limit = 4,
    /// Operation rejected because of the object's current state (e.g.
    /// `ReleaseResource` on a resource the caller does not hold at the top
    /// of its stack).
    NoFunc = 5,
    /// The caller still holds one or more resources.
    Resource = 6,
    /// The object is in a state that forbids the operation (e.g. `SetEvent`
    /// on a `SUSPENDED` task).
    State = 7,
    /// An argument is out of its valid range.
    Value = 8,
}

impl StatusType {
    /// `true` for [`StatusType::Ok`].
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, StatusType::Ok)
    }
}

/// The result type returned by SDVOS services.
///
/// `Ok(())` corresponds to `E_OK`; `Err(e)` carries one of the remaining
/// `E_OS_*` codes. Kernel-internal invariant violations never surface here —
/// they call [`Platform::panic`](crate::platform::Platform::panic) instead.
pub type Result<T = ()> = core::result::Result<T, StatusType>;

/// Identifies which service a failed call came from, for
/// `OSErrorGetServiceId`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ServiceId {
    ActivateTask,
    TerminateTask,
    ChainTask,
    Schedule,
    GetTaskId,
    GetTaskState,
    GetResource,
    ReleaseResource,
    SetEvent,
    ClearEvent,
    WaitEvent,
    GetEvent,
    SetRelAlarm,
    SetAbsAlarm,
    CancelAlarm,
    GetAlarm,
    IncrementCounter,
    GetCounterValue,
    GetElapsedValue,
    StartOs,
    ShutdownOs,
}

/// The process-wide error record an extended-status build fills in before
/// invoking `ErrorHook`.
#[derive(Debug, Clone, Copy)]
pub struct OsError {
    pub service: ServiceId,
    pub status: StatusType,
}
