//! Error types for pin construction, resolution and activation

use thiserror::Error;

use crate::descriptor::{Attribute, Axis};
use crate::host::HostError;

/// Errors raised while building, resolving or activating pins
#[derive(Debug, Error)]
pub enum PinError {
    /// An anchor was paired with a target anchor on a different axis
    #[error("cannot pin {anchor} ({anchor_axis} axis) to {target} ({target_axis} axis)")]
    AxisMismatch {
        anchor: Attribute,
        anchor_axis: Axis,
        target: Attribute,
        target_axis: Axis,
    },

    /// A constant relation was requested for an anchor that is not a dimension
    #[error("only width and height can be fixed to a constant, not {anchor}")]
    ConstantOnEdge { anchor: Attribute },

    /// A constant pin that also names a relation, offset or target
    #[error("{anchor} is fixed to a constant; relation, offset and target do not apply")]
    ConstantWithRelation { anchor: Attribute },

    /// A pin relative to another view was resolved without a reference view
    #[error("{anchor} pin needs a reference view")]
    MissingReference { anchor: Attribute },

    /// An offset or constant that is NaN or infinite
    #[error("{anchor} offset must be finite, got {value}")]
    NonFinite { anchor: Attribute, value: f64 },

    /// Resolution of one descriptor in a batch failed
    #[error("descriptor #{index}: {source}")]
    Descriptor {
        index: usize,
        #[source]
        source: Box<PinError>,
    },

    /// Unrecognised anchor or relation name
    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },

    /// The host toolkit refused an operation
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl PinError {
    /// Create an axis mismatch error for the given anchor pair
    pub fn axis_mismatch(anchor: Attribute, target: Attribute) -> Self {
        Self::AxisMismatch {
            anchor,
            anchor_axis: anchor.axis(),
            target,
            target_axis: target.axis(),
        }
    }

    /// Pass `value` through if it is finite
    pub fn check_finite(anchor: Attribute, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { anchor, value })
        }
    }

    /// Tag an error with the position of the descriptor that caused it
    pub fn at(self, index: usize) -> Self {
        Self::Descriptor {
            index,
            source: Box::new(self),
        }
    }

    /// Position of the failing descriptor, if known
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Descriptor { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }
}
