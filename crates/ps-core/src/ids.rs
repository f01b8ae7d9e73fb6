//! Strongly typed identifier wrappers.
//!
//! Ids are handed out by the host case (tasks, processes, equipment) or by an
//! equipment path (elements).  All are `Copy + Ord + Hash` so they key maps
//! and sorted sets directly; `BTreeSet<TaskId>` is used wherever iteration
//! order must be deterministic.

use std::fmt;

/// Generate a typed id wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty), $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $tag, self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a piece of equipment in the case.
    pub struct EquipmentId(u32), "equipment";
}

typed_id! {
    /// Index of a schedulable task (source or destination) in the case.
    pub struct TaskId(u32), "task";
}

typed_id! {
    /// Index of a mining process (Drill, Load, Haul, ...).
    pub struct ProcessId(u16), "process";
}

typed_id! {
    /// Identity of one element of an equipment path.  Unique within that path
    /// for the lifetime of a run, including elements synthesized at runtime.
    pub struct ElementId(u32), "element";
}
