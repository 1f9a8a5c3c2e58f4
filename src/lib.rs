//! Anchor Pins - declarative edge and size pins for constraint-based layout
//!
//! Callers describe intents ("top equal to the parent's top + 8", "height
//! fixed at 44") as [`Descriptor`] values. The resolver binds them to a
//! subject and a reference view, and the activator hands the whole batch to a
//! [`LayoutHost`] in one call.
//!
//! # Example
//!
//! ```rust
//! use anchor_pins::{fill_superview, EdgeInsets, Rect, TreeConfig, ViewTree};
//!
//! let mut tree = ViewTree::new(TreeConfig::new().with_root_size(200.0, 100.0));
//! let card = tree.add_view("card");
//! tree.insert(tree.root(), card).unwrap();
//!
//! let outcome = fill_superview(&mut tree, card, EdgeInsets::uniform(8.0)).unwrap();
//! assert_eq!(outcome.constraints().len(), 4);
//!
//! tree.layout();
//! assert!(tree
//!     .frame(card)
//!     .unwrap()
//!     .approx_eq(&Rect::new(8.0, 8.0, 184.0, 84.0), 0.001));
//! ```

pub mod activate;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod resolver;
pub mod scene;

pub use activate::{
    activate, attach_child, center_x_in_superview, center_y_in_superview, deactivate, fill_in,
    fill_superview, Activation,
};
pub use descriptor::{
    AnchorKind, Attribute, Axis, ConstantRelation, Descriptor, Dimension, Edge, EdgeInsets,
    HorizontalEdge, Pin, Relation, VerticalEdge,
};
pub use error::PinError;
pub use host::{
    ActiveConstraint, LayoutDirection, LayoutHost, Rect, TreeConfig, TreeError, ViewId, ViewTree,
};
pub use resolver::{resolve, resolve_all, AnchorRef, ConstraintRequest, Operator};
pub use scene::{Scene, SceneError};

/// Parse a TOML scene and compute its layout
///
/// # Example
///
/// ```rust
/// use anchor_pins::solve_scene;
///
/// let tree = solve_scene(r#"
///     [root]
///     width = 100
///     height = 100
///
///     [[views]]
///     name = "dot"
///     center_x = 0
///     center_y = 0
///     pins = [
///         { anchor = "width", constant = 10 },
///         { anchor = "height", constant = 10 },
///     ]
/// "#).unwrap();
///
/// let dot = tree.find("dot").unwrap();
/// assert!((tree.frame(dot).unwrap().x - 45.0).abs() < 0.001);
/// ```
pub fn solve_scene(source: &str) -> Result<ViewTree, SceneError> {
    Scene::from_str(source)?.solve()
}
