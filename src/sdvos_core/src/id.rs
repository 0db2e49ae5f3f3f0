//! Object identities.
//!
//! All kernel objects are statically declared; an [`Id`] is simply the
//! index of the object's descriptor into the config's slice for that
//! object kind — a small integer in `0..N` for `N` objects of that kind.

use core::fmt;

/// A zero-based object identity, the index into a static descriptor slice.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u16);

impl Id {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index as u16)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! id_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Id);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(Id::new(index))
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0.index()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0.index())
            }
        }
    };
}

id_newtype!(
    /// Identifies a task via its index into `Config::tasks`.
    TaskId
);
id_newtype!(
    /// Identifies a resource via its index into `Config::resources`.
    ResourceId
);
id_newtype!(
    /// Identifies a counter via its index into `Config::counters`.
    CounterId
);
id_newtype!(
    /// Identifies an alarm via its index into `Config::alarms`.
    AlarmId
);
