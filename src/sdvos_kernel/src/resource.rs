//! The Immediate Priority Ceiling Protocol: `GetResource`/`ReleaseResource`.
//!
//! A resource's ceiling is the highest static priority of any task that
//! ever accesses it. Acquiring a resource immediately raises the calling
//! task to that ceiling, which is what makes the protocol deadlock-free
//! and bounds blocking to at most one lower-priority critical section:
//! nothing able to preempt up to the ceiling can be made ready while the
//! resource is held, so no higher-priority task can ever block on it.

use sdvos_core::klock::Critical;
use sdvos_core::{error::Result, Platform, ResourceId, ServiceId, StatusType};

use crate::dispatch;
use crate::state::Kernel;
use crate::task::reschedule;

/// `GetResource(resource_id)`.
///
/// Resources must be acquired and released in strict LIFO order; this is
/// enforced at release, not at acquisition (any resource not currently
/// held may be acquired at any time).
pub fn get_resource<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    resource_id: ResourceId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(
            resource_id.index() < kernel.cfg.resources.len(),
            StatusType::Id
        );
        // Category-2 ISRs may call GetResource (spec.md 4.H): the ISR
        // trampoline leaves `kernel.running` pointing at the task it
        // interrupted, and that task's holder stack is exactly where the
        // resource is bookkept while the ISR body runs on top of it.
        let current = kernel
            .running
            .read(&tok)
            .expect("GetResource called with no running task");
        let ceiling = kernel.cfg.resources[resource_id.index()].ceiling;

        dispatch::check!(
            kernel.resource(resource_id).read(&tok).holder.is_none(),
            StatusType::State
        );
        dispatch::check!(
            kernel.task(current).read(&tok).current_priority <= ceiling,
            StatusType::Access
        );

        let td = kernel.task(current).write(&tok);
        let saved_priority = td.current_priority;
        td.push_holder(resource_id.index(), saved_priority);
        if ceiling > td.current_priority {
            td.current_priority = ceiling;
        }
        kernel.resource(resource_id).write(&tok).holder = Some(current);
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::GetResource, &result);
    // Raising our own priority can never make us preempt ourselves, so no
    // reschedule is needed here, only error-path bookkeeping.
    drop(tok);
    result
}

/// `ReleaseResource(resource_id)`.
///
/// Must name the most recently acquired, still-held resource (`E_OS_NOFUNC`
/// otherwise) — enforcing the LIFO discipline the ceiling protocol depends
/// on to restore a sane priority on every release.
pub fn release_resource<P: Platform, const PRIOS: usize, const SLOTS: usize, const NEST: usize>(
    kernel: &Kernel<P, PRIOS, SLOTS, NEST>,
    resource_id: ResourceId,
) -> Result<()> {
    let tok = Critical::enter::<P>();
    let result: Result<()> = (|| {
        dispatch::check!(
            resource_id.index() < kernel.cfg.resources.len(),
            StatusType::Id
        );
        // Category-2 ISRs may call ReleaseResource (spec.md 4.H); see the
        // matching note in `get_resource` above.
        let current = kernel
            .running
            .read(&tok)
            .expect("ReleaseResource called with no running task");

        dispatch::check!(
            kernel.resource(resource_id).read(&tok).holder == Some(current),
            StatusType::NoFunc
        );

        let td = kernel.task(current).write(&tok);
        let top = td.top_holder();
        dispatch::check!(
            top.map(|h| h.resource) == Some(resource_id.index()),
            StatusType::NoFunc
        );
        let held = td.pop_holder().expect("checked top_holder above");
        td.current_priority = held.saved_priority;
        kernel.resource(resource_id).write(&tok).holder = None;
        Ok(())
    })();
    dispatch::report(kernel, &tok, ServiceId::ReleaseResource, &result);
    // Dropping our priority back down can make a higher-priority task that
    // was blocked on the ceiling become the one to run next.
    reschedule(kernel, tok);
    result
}
