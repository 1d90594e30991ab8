//! Typed identifiers for graph slots and persisted rows.
//!
//! Keys identify an entity inside one `RentalGraph` before and after
//! persistence. Ids are the numeric primary keys assigned on first save.

use std::fmt::{Display, Formatter};

/// Primary key of a persisted owner row.
pub type OwnerId = i64;
/// Primary key of a persisted reviewer row.
pub type ReviewerId = i64;
/// Primary key of a persisted apartment row.
pub type ApartmentId = i64;
/// Primary key of a persisted review row.
pub type ReviewId = i64;

macro_rules! graph_key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Raw slot index, stable for the lifetime of the owning graph.
            pub fn index(self) -> u32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

graph_key!(
    /// Graph slot of an `Owner`.
    OwnerKey,
    "owner"
);
graph_key!(
    /// Graph slot of a `Reviewer`.
    ReviewerKey,
    "reviewer"
);
graph_key!(
    /// Graph slot of an `Apartment`.
    ApartmentKey,
    "apartment"
);
graph_key!(
    /// Graph slot of a `Review`.
    ReviewKey,
    "review"
);
