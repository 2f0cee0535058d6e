//! Typed identifiers.
//!
//! Worker and order ids are dense: `WorkerId(n)` is the `n`-th worker in
//! the store and `OrderId(n)` the `n`-th accepted order, so both double as
//! `Vec` indices through [`index`](WorkerId::index).  Ordering matters:
//! lower worker ids win cell conflicts and are dispatched first on ties.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "no such id"; never handed out by a store.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The id of the `i`-th entry of a dense collection.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < <$inner>::MAX as usize, "{} index {i} overflows", stringify!($name));
                $name(i as $inner)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($prefix, "{}"), self.0)
                } else {
                    f.write_str(concat!($prefix, "?"))
                }
            }
        }
    };
}

typed_id! {
    /// A worker.  Lower ids win cell conflicts.
    pub struct WorkerId(u32) = "w";
}

typed_id! {
    /// An order, numbered in acceptance order.
    pub struct OrderId(u32) = "o";
}

typed_id! {
    /// A shelf pick face on the grid.
    pub struct ShelfId(u32) = "s";
}
