//! Scene files: a view hierarchy and its pins described in TOML
//!
//! ```toml
//! [root]
//! width = 320
//! height = 200
//!
//! [[views]]
//! name = "card"
//! fill = { top = 8, leading = 8, bottom = 8, trailing = 8 }
//!
//! [[views]]
//! name = "title"
//! parent = "card"
//! pins = [
//!     { anchor = "top", offset = 12 },
//!     { anchor = "center_x" },
//!     { anchor = "height", constant = 44 },
//!     { anchor = "width", relation = "at_most", offset = -24 },
//! ]
//! ```
//!
//! Views are created in file order, then parented, then pinned, so pins may
//! reference views declared further down.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::activate::{activate, center_x_in_superview, center_y_in_superview, fill_superview};
use crate::descriptor::{Attribute, ConstantRelation, Descriptor, EdgeInsets, Relation};
use crate::error::PinError;
use crate::host::{LayoutDirection, Rect, TreeConfig, TreeError, ViewId, ViewTree};

/// Errors that can occur when loading or applying a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("view '{0}' is declared more than once")]
    DuplicateView(String),

    #[error("view '{referenced_by}' refers to unknown view '{name}'")]
    UnknownView { name: String, referenced_by: String },

    #[error("view '{view}': {source}")]
    Pin {
        view: String,
        #[source]
        source: PinError,
    },

    #[error("{owner}: {field} must be finite, got {value}")]
    NonFinite {
        owner: String,
        field: &'static str,
        value: f64,
    },

    #[error("view '{view}': {source}")]
    Tree {
        view: String,
        #[source]
        source: TreeError,
    },
}

/// A parsed scene file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    pub root: RootSpec,
    #[serde(default)]
    pub views: Vec<ViewSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootSpec {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub direction: DirectionSpec,
}

impl Default for RootSpec {
    fn default() -> Self {
        let (width, height) = TreeConfig::default().root_size;
        Self {
            width,
            height,
            direction: DirectionSpec::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSpec {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl From<DirectionSpec> for LayoutDirection {
    fn from(spec: DirectionSpec) -> Self {
        match spec {
            DirectionSpec::LeftToRight => LayoutDirection::LeftToRight,
            DirectionSpec::RightToLeft => LayoutDirection::RightToLeft,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub name: String,
    /// Defaults to the root view
    pub parent: Option<String>,
    /// View the pins are resolved against; defaults to the parent
    pub reference: Option<String>,
    /// Initial frame, enforced while the view has no pins
    pub frame: Option<FrameSpec>,
    pub fill: Option<InsetsSpec>,
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    #[serde(default)]
    pub pins: Vec<PinSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsetsSpec {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl FrameSpec {
    fn to_rect(self, owner: &str) -> Result<Rect, SceneError> {
        Ok(Rect::new(
            finite(owner, "x", self.x)?,
            finite(owner, "y", self.y)?,
            finite(owner, "width", self.width)?,
            finite(owner, "height", self.height)?,
        ))
    }
}

fn finite(owner: &str, field: &'static str, value: f64) -> Result<f64, SceneError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::NonFinite {
            owner: owner.to_string(),
            field,
            value,
        })
    }
}

impl From<InsetsSpec> for EdgeInsets {
    fn from(spec: InsetsSpec) -> Self {
        EdgeInsets::new(spec.top, spec.leading, spec.bottom, spec.trailing)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinSpec {
    pub anchor: String,
    pub relation: Option<String>,
    pub offset: Option<f64>,
    /// Anchor on the reference view; defaults to `anchor`
    pub target: Option<String>,
    /// Fix a dimension to this value instead of relating it to the reference
    pub constant: Option<f64>,
}

impl PinSpec {
    /// Turn the textual pin into a descriptor, checking names and axes
    pub fn to_descriptor(&self) -> Result<Descriptor, PinError> {
        let anchor: Attribute = self.anchor.parse()?;

        if let Some(value) = self.constant {
            if self.target.is_some() || self.relation.is_some() || self.offset.is_some() {
                return Err(PinError::ConstantWithRelation { anchor });
            }
            let value = PinError::check_finite(anchor, value)?;
            return Descriptor::constant(anchor, ConstantRelation::EqualToConstant(value));
        }

        let offset = PinError::check_finite(anchor, self.offset.unwrap_or(0.0))?;
        let relation = match &self.relation {
            Some(name) => name.parse::<Relation>()?,
            None => Relation::default(),
        }
        .with_offset(offset);
        let target = self
            .target
            .as_deref()
            .map(str::parse::<Attribute>)
            .transpose()?;

        Descriptor::from_attributes(anchor, relation, target)
    }
}

impl FromStr for Scene {
    type Err = SceneError;

    fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }
}

impl Scene {
    /// Load scene from TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Load scene from TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        content.parse()
    }

    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig::new()
            .with_root_size(self.root.width, self.root.height)
            .with_direction(self.root.direction.into())
    }

    /// Create the views, parent them and activate their pins
    pub fn build(&self) -> Result<ViewTree, SceneError> {
        finite("root", "width", self.root.width)?;
        finite("root", "height", self.root.height)?;
        let mut tree = ViewTree::new(self.tree_config());

        let mut seen = HashSet::new();
        seen.insert("root");
        let mut ids = Vec::with_capacity(self.views.len());
        for spec in &self.views {
            if !seen.insert(spec.name.as_str()) {
                return Err(SceneError::DuplicateView(spec.name.clone()));
            }
            ids.push(tree.add_view(spec.name.as_str()));
        }

        for (spec, &id) in self.views.iter().zip(&ids) {
            let parent = lookup(&tree, spec.parent.as_deref(), spec)?.unwrap_or(tree.root());
            tree.insert(parent, id).map_err(|source| SceneError::Tree {
                view: spec.name.clone(),
                source,
            })?;
            if let Some(f) = spec.frame {
                tree.set_frame(id, f.to_rect(&spec.name)?)
                    .map_err(|source| SceneError::Tree {
                        view: spec.name.clone(),
                        source,
                    })?;
            }
        }

        for (spec, &id) in self.views.iter().zip(&ids) {
            apply_pins(&mut tree, spec, id).map_err(|source| SceneError::Pin {
                view: spec.name.clone(),
                source,
            })?;
        }

        log::debug!("built scene with {} view(s)", self.views.len());
        Ok(tree)
    }

    /// Build the scene and compute every frame
    pub fn solve(&self) -> Result<ViewTree, SceneError> {
        let mut tree = self.build()?;
        tree.layout();
        Ok(tree)
    }
}

fn lookup(tree: &ViewTree, name: Option<&str>, spec: &ViewSpec) -> Result<Option<ViewId>, SceneError> {
    match name {
        None => Ok(None),
        Some(name) => tree
            .find(name)
            .map(Some)
            .ok_or_else(|| SceneError::UnknownView {
                name: name.to_string(),
                referenced_by: spec.name.clone(),
            }),
    }
}

fn apply_pins(tree: &mut ViewTree, spec: &ViewSpec, id: ViewId) -> Result<(), PinError> {
    if let Some(insets) = spec.fill {
        warn_if_skipped(fill_superview(tree, id, insets.into())?.is_activated(), spec, "fill");
    }
    if let Some(offset) = spec.center_x {
        warn_if_skipped(center_x_in_superview(tree, id, offset)?.is_activated(), spec, "center_x");
    }
    if let Some(offset) = spec.center_y {
        warn_if_skipped(center_y_in_superview(tree, id, offset)?.is_activated(), spec, "center_y");
    }

    if spec.pins.is_empty() {
        return Ok(());
    }
    let descriptors = spec
        .pins
        .iter()
        .enumerate()
        .map(|(index, pin)| pin.to_descriptor().map_err(|e| e.at(index)))
        .collect::<Result<Vec<_>, _>>()?;

    let reference = match spec.reference.as_deref() {
        Some(name) => Some(tree.find(name).ok_or_else(|| PinError::unknown("view", name))?),
        None => tree.parent(id),
    };
    activate(tree, id, &descriptors, reference)?;
    Ok(())
}

fn warn_if_skipped(activated: bool, spec: &ViewSpec, what: &str) {
    if !activated {
        log::warn!("{}: {} skipped, view has no superview", spec.name, what);
    }
}
