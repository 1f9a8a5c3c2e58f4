//! Boundary to the UI toolkit that owns views and solves constraints
//!
//! The pin layer only needs a handful of primitives from its host: the
//! hierarchy relation, a switch for implicit frame constraints, and batch
//! creation/activation of constraints. [`ViewTree`] is a self-contained host
//! backed by the kasuari Cassowary solver.

pub mod config;
pub mod solver;
pub mod tree;
pub mod types;

pub use config::{LayoutDirection, TreeConfig};
pub use solver::{ConstraintSolver, SolverError};
pub use tree::{ActiveConstraint, TreeError, ViewTree};
pub use types::Rect;

use std::fmt;

use crate::resolver::ConstraintRequest;

/// Error type hosts report through [`crate::PinError::Host`]
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to a view owned by a host.
///
/// The index is opaque to the pin layer; each host decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) usize);

impl ViewId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ViewId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Primitives the pin layer consumes from a UI toolkit
pub trait LayoutHost {
    /// Toolkit-native constraint handle
    type Constraint;

    fn superview(&self, view: ViewId) -> Option<ViewId>;

    /// Make `child` a subview of `parent`, detaching it from any previous parent
    fn add_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), HostError>;

    /// Toggle the constraints the host synthesises from a view's frame
    fn set_autosizing(&mut self, view: ViewId, enabled: bool) -> Result<(), HostError>;

    /// Create an inactive constraint for a resolved request
    fn make_constraint(&mut self, request: &ConstraintRequest) -> Self::Constraint;

    /// Activate a batch of constraints in one step
    fn activate(&mut self, constraints: &[Self::Constraint]) -> Result<(), HostError>;

    fn deactivate(&mut self, constraints: &[Self::Constraint]) -> Result<(), HostError>;
}
