//! Shared-memory programs: access labels, the release-acquire memory model,
//! refinement under it, branching programs and data race detection.

pub mod label;
pub mod race;
pub mod refinement;
pub mod release_acquire;
pub mod symbolic;

pub use race::DataRaceDetector;
pub use refinement::MemoryRefinement;
pub use release_acquire::ReleaseAcquireModel;
pub use symbolic::{if_not_then, if_then, SymbolicProgram};
