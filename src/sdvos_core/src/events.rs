//! Event masks.
//!
//! Events are not standalone objects; they are individual bits within a
//! per-(extended-)task mask, so there is no `EventCfg` descriptor — a
//! crate using SDVOS simply picks which bit of a task's `EventMask` means
//! what, the same way OSEK generated glue defines `EV_*` bit constants.

use bitflags::bitflags;

bitflags! {
    /// A task's event mask. 32 bits, matching OSEK's `TickType`-wide masks
    /// on the targets this kernel cares about (8/16/32-bit MCUs never need
    /// more than 32 independent event flags per task in practice).
    #[derive(Default)]
    pub struct EventMask: u32 {
        const EVENT_0 = 1 << 0;
        const EVENT_1 = 1 << 1;
        const EVENT_2 = 1 << 2;
        const EVENT_3 = 1 << 3;
        const EVENT_4 = 1 << 4;
        const EVENT_5 = 1 << 5;
        const EVENT_6 = 1 << 6;
        const EVENT_7 = 1 << 7;
    }
}

impl EventMask {
    /// The empty mask, usable in `const` position (`EventMask::empty()` is
    /// not `const fn` in `bitflags` 1.x).
    pub const NONE: Self = Self { bits: 0 };
}
