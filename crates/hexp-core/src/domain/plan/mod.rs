//! Pure plan checks run before any file is touched.
//!
//! Each check is a stateless unit struct with a `check`/`resolve` entry
//! point returning a serializable result, plus an `error_message` that
//! renders a failed result as one aggregated, multi-line string.

mod collisions;
mod compatibility;
mod conflicts;
mod dependencies;

pub use collisions::{CollisionInfo, CollisionResult, FileCollisionDetector};
pub use compatibility::{CompatibilityChecker, CompatibilityResult};
pub use conflicts::{ConflictDetector, ConflictInfo, ConflictResult};
pub use dependencies::{DependencyResolver, ResolvedOrder};
