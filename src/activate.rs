//! Batch activation of descriptors and the convenience entry points built on it
//!
//! Every call adds a fresh set of constraints. Nothing is deduplicated or
//! replaced: pinning the same view twice leaves both sets active.

use crate::descriptor::{Descriptor, EdgeInsets, Relation};
use crate::error::PinError;
use crate::host::{LayoutHost, ViewId};
use crate::resolver::resolve_all;

/// Outcome of a convenience entry point
#[derive(Debug)]
#[must_use]
pub enum Activation<C> {
    /// Constraints created and activated, in descriptor order
    Activated(Vec<C>),
    /// The subject had no superview to pin against; nothing happened
    NoReference,
}

impl<C> Activation<C> {
    pub fn constraints(&self) -> &[C] {
        match self {
            Activation::Activated(constraints) => constraints.as_slice(),
            Activation::NoReference => &[],
        }
    }

    pub fn into_constraints(self) -> Vec<C> {
        match self {
            Activation::Activated(constraints) => constraints,
            Activation::NoReference => Vec::new(),
        }
    }

    pub fn is_activated(&self) -> bool {
        matches!(self, Activation::Activated(_))
    }
}

/// Resolve `descriptors` for `subject` against `reference` and activate them
/// as a single batch.
///
/// The subject's autosizing is disabled first, exactly once. All descriptors
/// are resolved before anything reaches the host, so a resolution failure
/// (reported with the descriptor's position) activates nothing.
pub fn activate<H: LayoutHost + ?Sized>(
    host: &mut H,
    subject: ViewId,
    descriptors: &[Descriptor],
    reference: Option<ViewId>,
) -> Result<Vec<H::Constraint>, PinError> {
    host.set_autosizing(subject, false)?;

    let requests = resolve_all(descriptors, subject, reference)?;
    let constraints: Vec<_> = requests.iter().map(|r| host.make_constraint(r)).collect();
    host.activate(&constraints)?;

    log::debug!(
        "activated {} constraint(s) on {}",
        constraints.len(),
        subject
    );
    Ok(constraints)
}

/// Deactivate previously activated constraints in one call
pub fn deactivate<H: LayoutHost + ?Sized>(
    host: &mut H,
    constraints: &[H::Constraint],
) -> Result<(), PinError> {
    host.deactivate(constraints)?;
    Ok(())
}

/// Add `child` to `parent`, then pin it against `parent`
pub fn attach_child<H: LayoutHost + ?Sized>(
    host: &mut H,
    parent: ViewId,
    child: ViewId,
    pins: &[Descriptor],
) -> Result<Vec<H::Constraint>, PinError> {
    host.add_subview(parent, child)?;
    activate(host, child, pins, Some(parent))
}

/// Pin against the superview, or do nothing when there is none
fn activate_in_superview<H: LayoutHost + ?Sized>(
    host: &mut H,
    view: ViewId,
    pins: &[Descriptor],
) -> Result<Activation<H::Constraint>, PinError> {
    match host.superview(view) {
        Some(parent) => activate(host, view, pins, Some(parent)).map(Activation::Activated),
        None => {
            log::debug!("{} has no superview; skipping {} pin(s)", view, pins.len());
            Ok(Activation::NoReference)
        }
    }
}

/// Pin all four edges to the superview, inset by `padding`
pub fn fill_superview<H: LayoutHost + ?Sized>(
    host: &mut H,
    view: ViewId,
    padding: EdgeInsets,
) -> Result<Activation<H::Constraint>, PinError> {
    activate_in_superview(host, view, &padding.fill_descriptors())
}

/// Add `view` to `parent` and fill it
pub fn fill_in<H: LayoutHost + ?Sized>(
    host: &mut H,
    parent: ViewId,
    view: ViewId,
    padding: EdgeInsets,
) -> Result<Vec<H::Constraint>, PinError> {
    host.add_subview(parent, view)?;
    Ok(fill_superview(host, view, padding)?.into_constraints())
}

pub fn center_x_in_superview<H: LayoutHost + ?Sized>(
    host: &mut H,
    view: ViewId,
    constant: f64,
) -> Result<Activation<H::Constraint>, PinError> {
    activate_in_superview(host, view, &[Descriptor::center_x(Relation::EqualTo(constant))])
}

pub fn center_y_in_superview<H: LayoutHost + ?Sized>(
    host: &mut H,
    view: ViewId,
    constant: f64,
) -> Result<Activation<H::Constraint>, PinError> {
    activate_in_superview(host, view, &[Descriptor::center_y(Relation::EqualTo(constant))])
}
