//! Strongly-typed identifiers used across the engine.
//!
//! Downstream crates (planner, exec) should *not* use raw integers for IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(OpId);
new_id!(SourceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_their_type_name() {
        assert_eq!(OpId::new(3).to_string(), "OpId(3)");
        assert_eq!(SourceId::new(0).get(), 0);
        assert!(OpId::new(1) < OpId::new(2));
    }
}
