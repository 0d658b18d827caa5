//! Convenient re-exports for downstream crates.

pub use crate::config::EngineConfig;
pub use crate::dag::{OpDescriptor, QueryPlan, SortDirection, SourceKind};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::{OpId, SourceId};
pub use crate::index::{Index, IndexRange};
pub use crate::manifest::{ManifestId, RunManifest, RunTarget};
