//! A retained view hierarchy that activates constraints in a Cassowary solver

use std::fmt;

use kasuari::{Constraint, Expression, Strength, Variable, WeightedRelation::*};
use thiserror::Error;

use super::config::{LayoutDirection, TreeConfig};
use super::solver::{ConstraintSolver, SolverError};
use super::types::Rect;
use super::{HostError, LayoutHost, ViewId};
use crate::descriptor::Attribute;
use crate::resolver::{AnchorRef, ConstraintRequest, Operator};

/// Errors from view tree operations
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("unknown view {0}")]
    UnknownView(ViewId),

    #[error("cannot add '{child}' under '{parent}': it would become its own ancestor")]
    Cycle { parent: String, child: String },

    #[error("constraint {constraint} appears more than once in the batch")]
    RepeatedHandle { constraint: String },

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Handle to a constraint created by a [`ViewTree`]
#[derive(Clone)]
pub struct ActiveConstraint {
    request: ConstraintRequest,
    description: String,
    constraint: Constraint,
}

impl ActiveConstraint {
    pub fn request(&self) -> &ConstraintRequest {
        &self.request
    }

    /// The request rendered with view names
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for ActiveConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveConstraint")
            .field(&self.description)
            .finish()
    }
}

/// Solver variables of one view
#[derive(Debug, Clone, Copy)]
struct FrameVars {
    x: Variable,
    y: Variable,
    width: Variable,
    height: Variable,
}

impl FrameVars {
    fn new() -> Self {
        Self {
            x: Variable::new(),
            y: Variable::new(),
            width: Variable::new(),
            height: Variable::new(),
        }
    }
}

struct ViewNode {
    name: String,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    frame: Rect,
    vars: FrameVars,
    autosizing: bool,
    /// Constraints synthesised from `frame` while autosizing is on
    frame_constraints: Vec<Constraint>,
    /// User constraints activated with this view as subject
    constraints: Vec<ActiveConstraint>,
}

/// A view hierarchy whose layout is computed by a constraint solver.
///
/// All frames are in root coordinates. New views start with a zero frame and
/// autosizing enabled, so they are fully determined until pins take over.
pub struct ViewTree {
    config: TreeConfig,
    views: Vec<ViewNode>,
    solver: ConstraintSolver,
}

impl ViewTree {
    pub fn new(config: TreeConfig) -> Self {
        let mut tree = Self {
            config,
            views: Vec::new(),
            solver: ConstraintSolver::new(),
        };
        let (width, height) = tree.config.root_size;
        tree.push_view("root", Rect::new(0.0, 0.0, width, height));
        tree
    }

    pub fn root(&self) -> ViewId {
        ViewId(0)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Create a detached view
    pub fn add_view(&mut self, name: impl Into<String>) -> ViewId {
        self.push_view(name, Rect::zero())
    }

    fn push_view(&mut self, name: impl Into<String>, frame: Rect) -> ViewId {
        let id = ViewId(self.views.len());
        self.views.push(ViewNode {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            frame,
            vars: FrameVars::new(),
            autosizing: true,
            frame_constraints: Vec::new(),
            constraints: Vec::new(),
        });
        if let Err(e) = self.install_frame_constraints(id) {
            // A fresh view's variables appear in no other constraint
            log::warn!("could not pin frame of new view {}: {}", id, e);
        }
        id
    }

    fn node(&self, view: ViewId) -> Result<&ViewNode, TreeError> {
        self.views.get(view.0).ok_or(TreeError::UnknownView(view))
    }

    fn node_mut(&mut self, view: ViewId) -> Result<&mut ViewNode, TreeError> {
        self.views.get_mut(view.0).ok_or(TreeError::UnknownView(view))
    }

    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.views.iter().position(|v| v.name == name).map(ViewId)
    }

    pub fn name(&self, view: ViewId) -> Option<&str> {
        self.views.get(view.0).map(|v| v.name.as_str())
    }

    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.views.get(view.0).and_then(|v| v.parent)
    }

    pub fn children(&self, view: ViewId) -> &[ViewId] {
        self.views
            .get(view.0)
            .map(|v| v.children.as_slice())
            .unwrap_or(&[])
    }

    /// All views in creation order
    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        (0..self.views.len()).map(ViewId)
    }

    pub fn frame(&self, view: ViewId) -> Option<Rect> {
        self.views.get(view.0).map(|v| v.frame)
    }

    pub fn autosizing(&self, view: ViewId) -> Option<bool> {
        self.views.get(view.0).map(|v| v.autosizing)
    }

    /// User constraints activated with `view` as subject
    pub fn constraints_of(&self, view: ViewId) -> &[ActiveConstraint] {
        self.views
            .get(view.0)
            .map(|v| v.constraints.as_slice())
            .unwrap_or(&[])
    }

    /// Number of constraints in the solver, including autosizing ones
    pub fn solver_constraint_count(&self) -> usize {
        self.solver.active_count()
    }

    /// Make `child` a subview of `parent`
    pub fn insert(&mut self, parent: ViewId, child: ViewId) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(TreeError::Cycle {
                    parent: self.label(parent),
                    child: self.label(child),
                });
            }
            ancestor = self.parent(current);
        }

        if let Some(old) = self.views[child.0].parent.take() {
            self.views[old.0].children.retain(|&c| c != child);
        }
        self.views[child.0].parent = Some(parent);
        self.views[parent.0].children.push(child);
        Ok(())
    }

    /// Set a view's frame. While autosizing is on the frame is enforced.
    ///
    /// If the new frame conflicts with active constraints the previous frame
    /// and its constraints are kept.
    pub fn set_frame(&mut self, view: ViewId, frame: Rect) -> Result<(), TreeError> {
        let node = self.node_mut(view)?;
        if !node.autosizing {
            node.frame = frame;
            return Ok(());
        }

        self.remove_frame_constraints(view)?;
        let previous = std::mem::replace(&mut self.views[view.0].frame, frame);
        if let Err(e) = self.install_frame_constraints(view) {
            self.views[view.0].frame = previous;
            self.install_frame_constraints(view)?;
            return Err(e);
        }
        Ok(())
    }

    /// Toggle the frame constraints of a view. The flag only changes once the
    /// solver has accepted the change.
    pub fn set_autosizing_enabled(&mut self, view: ViewId, enabled: bool) -> Result<(), TreeError> {
        if self.node(view)?.autosizing == enabled {
            return Ok(());
        }
        if enabled {
            self.install_frame_constraints(view)?;
        } else {
            self.remove_frame_constraints(view)?;
        }
        self.views[view.0].autosizing = enabled;
        Ok(())
    }

    fn install_frame_constraints(&mut self, view: ViewId) -> Result<(), TreeError> {
        let node = self.node(view)?;
        let (vars, frame) = (node.vars, node.frame);
        let constraints = vec![
            vars.x | EQ(Strength::REQUIRED) | frame.x,
            vars.y | EQ(Strength::REQUIRED) | frame.y,
            vars.width | EQ(Strength::REQUIRED) | frame.width,
            vars.height | EQ(Strength::REQUIRED) | frame.height,
        ];
        let desc = format!("{} frame", self.label(view));
        self.solver.add_batch(
            &constraints
                .iter()
                .map(|c| (c, desc.as_str()))
                .collect::<Vec<_>>(),
        )?;
        self.node_mut(view)?.frame_constraints = constraints;
        Ok(())
    }

    fn remove_frame_constraints(&mut self, view: ViewId) -> Result<(), TreeError> {
        self.node(view)?;
        let desc = format!("{} frame", self.label(view));
        while let Some(constraint) = self.views[view.0].frame_constraints.pop() {
            if let Err(e) = self.solver.remove(&constraint, &desc) {
                self.views[view.0].frame_constraints.push(constraint);
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Solver expression for an anchor
    fn expression(&self, anchor: AnchorRef) -> Expression {
        let vars = match self.views.get(anchor.view.0) {
            Some(node) => node.vars,
            None => return Expression::from_constant(0.0),
        };
        let rtl = self.config.direction == LayoutDirection::RightToLeft;
        match anchor.attribute {
            Attribute::Top => vars.y.into(),
            Attribute::Bottom => vars.y + vars.height,
            Attribute::CenterY => vars.y + vars.height * 0.5,
            Attribute::Leading if rtl => vars.x + vars.width,
            Attribute::Leading => vars.x.into(),
            Attribute::Trailing if rtl => vars.x.into(),
            Attribute::Trailing => vars.x + vars.width,
            Attribute::CenterX => vars.x + vars.width * 0.5,
            Attribute::Height => vars.height.into(),
            Attribute::Width => vars.width.into(),
        }
    }

    fn label(&self, view: ViewId) -> String {
        self.name(view)
            .map(str::to_string)
            .unwrap_or_else(|| view.to_string())
    }

    /// Render a request with view names instead of ids
    pub fn describe(&self, request: &ConstraintRequest) -> String {
        request.render(|anchor| format!("{}.{}", self.label(anchor.view), anchor.attribute))
    }

    /// Horizontal offsets are written for left-to-right layouts and point
    /// the other way when the direction flips
    fn directed_constant(&self, request: &ConstraintRequest) -> f64 {
        let flips = matches!(
            request.subject.attribute,
            Attribute::Leading | Attribute::Trailing | Attribute::CenterX
        );
        if flips && request.reference.is_some() && self.config.direction == LayoutDirection::RightToLeft {
            -request.constant
        } else {
            request.constant
        }
    }

    /// Solve and update every view's frame
    pub fn layout(&mut self) {
        self.solver.refresh();
        for node in &mut self.views {
            let vars = node.vars;
            node.frame = Rect::new(
                self.solver.value(vars.x),
                self.solver.value(vars.y),
                self.solver.value(vars.width),
                self.solver.value(vars.height),
            );
        }
        log::debug!("laid out {} view(s)", self.views.len());
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl LayoutHost for ViewTree {
    type Constraint = ActiveConstraint;

    fn superview(&self, view: ViewId) -> Option<ViewId> {
        self.parent(view)
    }

    fn add_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), HostError> {
        Ok(self.insert(parent, child)?)
    }

    fn set_autosizing(&mut self, view: ViewId, enabled: bool) -> Result<(), HostError> {
        Ok(self.set_autosizing_enabled(view, enabled)?)
    }

    fn make_constraint(&mut self, request: &ConstraintRequest) -> ActiveConstraint {
        let subject = self.expression(request.subject);
        let constant = self.directed_constant(request);
        let target = match request.reference {
            Some(reference) => self.expression(reference) + constant,
            None => Expression::from_constant(constant),
        };
        let constraint = match request.operator {
            Operator::Equal => subject | EQ(Strength::REQUIRED) | target,
            Operator::GreaterOrEqual => subject | GE(Strength::REQUIRED) | target,
            Operator::LessOrEqual => subject | LE(Strength::REQUIRED) | target,
        };
        ActiveConstraint {
            request: *request,
            description: self.describe(request),
            constraint,
        }
    }

    fn activate(&mut self, constraints: &[ActiveConstraint]) -> Result<(), HostError> {
        for c in constraints {
            self.node(c.request.subject.view)?;
            if let Some(reference) = c.request.reference {
                self.node(reference.view)?;
            }
        }
        let batch: Vec<_> = constraints
            .iter()
            .map(|c| (&c.constraint, c.description.as_str()))
            .collect();
        self.solver.add_batch(&batch)?;
        for c in constraints {
            log::trace!("activated {}", c.description);
            self.views[c.request.subject.view.0].constraints.push(c.clone());
        }
        Ok(())
    }

    /// Remove every constraint of the batch, or none of them
    fn deactivate(&mut self, constraints: &[ActiveConstraint]) -> Result<(), HostError> {
        for (i, c) in constraints.iter().enumerate() {
            if constraints[..i].iter().any(|p| p.constraint == c.constraint) {
                return Err(TreeError::RepeatedHandle {
                    constraint: c.description.clone(),
                }
                .into());
            }
            if !self.solver.contains(&c.constraint) {
                return Err(TreeError::from(SolverError::NotActive {
                    constraint: c.description.clone(),
                })
                .into());
            }
        }

        for c in constraints {
            self.solver.remove(&c.constraint, &c.description)?;
            if let Some(node) = self.views.get_mut(c.request.subject.view.0) {
                node.constraints.retain(|active| active.constraint != c.constraint);
            }
            log::trace!("deactivated {}", c.description);
        }
        Ok(())
    }
}
