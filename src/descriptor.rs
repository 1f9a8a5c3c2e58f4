//! Descriptor model: what to pin, how, and against which anchor
//!
//! Descriptors never reference a live view. They are built by the caller,
//! handed to the resolver together with a subject and a reference view, and
//! dropped. Edges are split per axis so a vertical edge cannot be pinned to a
//! horizontal anchor; the dynamic constructors ([`Descriptor::edge`],
//! [`Descriptor::from_attributes`]) check the axis and fail fast instead.

use std::fmt;
use std::str::FromStr;

use crate::error::PinError;

/// Axis an anchor lives on. Anchors only pair with anchors of the same axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
    /// Width and height anchors
    Size,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Vertical => "vertical",
            Axis::Horizontal => "horizontal",
            Axis::Size => "size",
        })
    }
}

/// Any anchor of a view, edge or dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterX,
    CenterY,
    Height,
    Width,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::Height,
        Attribute::Width,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Attribute::Top | Attribute::Bottom | Attribute::CenterY => Axis::Vertical,
            Attribute::Leading | Attribute::Trailing | Attribute::CenterX => Axis::Horizontal,
            Attribute::Height | Attribute::Width => Axis::Size,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::CenterX => "center_x",
            Attribute::CenterY => "center_y",
            Attribute::Height => "height",
            Attribute::Width => "width",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| PinError::unknown("anchor", s))
    }
}

/// An edge or center line, untyped by axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterX,
    CenterY,
}

impl Edge {
    pub fn axis(self) -> Axis {
        Attribute::from(self).axis()
    }
}

impl From<Edge> for Attribute {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Top => Attribute::Top,
            Edge::Bottom => Attribute::Bottom,
            Edge::Leading => Attribute::Leading,
            Edge::Trailing => Attribute::Trailing,
            Edge::CenterX => Attribute::CenterX,
            Edge::CenterY => Attribute::CenterY,
        }
    }
}

/// Edges on the vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalEdge {
    Top,
    Bottom,
    CenterY,
}

/// Edges on the horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalEdge {
    Leading,
    Trailing,
    CenterX,
}

/// Size anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Height,
    Width,
}

impl From<VerticalEdge> for Edge {
    fn from(edge: VerticalEdge) -> Self {
        match edge {
            VerticalEdge::Top => Edge::Top,
            VerticalEdge::Bottom => Edge::Bottom,
            VerticalEdge::CenterY => Edge::CenterY,
        }
    }
}

impl From<HorizontalEdge> for Edge {
    fn from(edge: HorizontalEdge) -> Self {
        match edge {
            HorizontalEdge::Leading => Edge::Leading,
            HorizontalEdge::Trailing => Edge::Trailing,
            HorizontalEdge::CenterX => Edge::CenterX,
        }
    }
}

impl TryFrom<Attribute> for Edge {
    type Error = Axis;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Top => Ok(Edge::Top),
            Attribute::Bottom => Ok(Edge::Bottom),
            Attribute::Leading => Ok(Edge::Leading),
            Attribute::Trailing => Ok(Edge::Trailing),
            Attribute::CenterX => Ok(Edge::CenterX),
            Attribute::CenterY => Ok(Edge::CenterY),
            Attribute::Height | Attribute::Width => Err(Axis::Size),
        }
    }
}

impl TryFrom<Attribute> for Dimension {
    type Error = Axis;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Height => Ok(Dimension::Height),
            Attribute::Width => Ok(Dimension::Width),
            other => Err(other.axis()),
        }
    }
}

impl TryFrom<Edge> for VerticalEdge {
    type Error = Axis;

    /// Fails with the edge's actual axis
    fn try_from(edge: Edge) -> Result<Self, Self::Error> {
        match edge {
            Edge::Top => Ok(VerticalEdge::Top),
            Edge::Bottom => Ok(VerticalEdge::Bottom),
            Edge::CenterY => Ok(VerticalEdge::CenterY),
            other => Err(other.axis()),
        }
    }
}

impl TryFrom<Edge> for HorizontalEdge {
    type Error = Axis;

    fn try_from(edge: Edge) -> Result<Self, Self::Error> {
        match edge {
            Edge::Leading => Ok(HorizontalEdge::Leading),
            Edge::Trailing => Ok(HorizontalEdge::Trailing),
            Edge::CenterX => Ok(HorizontalEdge::CenterX),
            other => Err(other.axis()),
        }
    }
}

/// An anchor kind bound to a single axis
pub trait AnchorKind: Copy + fmt::Debug {
    const AXIS: Axis;

    fn attribute(self) -> Attribute;
}

impl AnchorKind for VerticalEdge {
    const AXIS: Axis = Axis::Vertical;

    fn attribute(self) -> Attribute {
        Edge::from(self).into()
    }
}

impl AnchorKind for HorizontalEdge {
    const AXIS: Axis = Axis::Horizontal;

    fn attribute(self) -> Attribute {
        Edge::from(self).into()
    }
}

impl AnchorKind for Dimension {
    const AXIS: Axis = Axis::Size;

    fn attribute(self) -> Attribute {
        match self {
            Dimension::Height => Attribute::Height,
            Dimension::Width => Attribute::Width,
        }
    }
}

/// Comparison between the subject anchor and the reference anchor plus an offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation {
    EqualTo(f64),
    AtLeast(f64),
    AtMost(f64),
}

impl Relation {
    pub fn equal() -> Self {
        Relation::EqualTo(0.0)
    }

    pub fn at_least() -> Self {
        Relation::AtLeast(0.0)
    }

    pub fn at_most() -> Self {
        Relation::AtMost(0.0)
    }

    /// Same comparison with a different offset
    pub fn with_offset(self, offset: f64) -> Self {
        match self {
            Relation::EqualTo(_) => Relation::EqualTo(offset),
            Relation::AtLeast(_) => Relation::AtLeast(offset),
            Relation::AtMost(_) => Relation::AtMost(offset),
        }
    }

    pub fn offset(self) -> f64 {
        match self {
            Relation::EqualTo(o) | Relation::AtLeast(o) | Relation::AtMost(o) => o,
        }
    }
}

impl Default for Relation {
    fn default() -> Self {
        Relation::equal()
    }
}

impl FromStr for Relation {
    type Err = PinError;

    /// Parses the comparison only; the offset is zero
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" | "eq" => Ok(Relation::equal()),
            "at_least" | "ge" => Ok(Relation::at_least()),
            "at_most" | "le" => Ok(Relation::at_most()),
            _ => Err(PinError::unknown("relation", s)),
        }
    }
}

/// A dimension fixed to an absolute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantRelation {
    EqualToConstant(f64),
}

impl ConstantRelation {
    pub fn value(self) -> f64 {
        match self {
            ConstantRelation::EqualToConstant(v) => v,
        }
    }
}

impl Default for ConstantRelation {
    fn default() -> Self {
        ConstantRelation::EqualToConstant(0.0)
    }
}

/// `anchor <relation> target` where `target` is on the reference view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin<A> {
    pub anchor: A,
    pub relation: Relation,
    pub target: A,
}

impl<A: AnchorKind> Pin<A> {
    pub fn new(anchor: A, relation: Relation, target: A) -> Self {
        Self {
            anchor,
            relation,
            target,
        }
    }

    /// Pin an anchor to the same anchor of the reference
    pub fn matching(anchor: A, relation: Relation) -> Self {
        Self::new(anchor, relation, anchor)
    }
}

/// A single layout intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor {
    Vertical(Pin<VerticalEdge>),
    Horizontal(Pin<HorizontalEdge>),
    Dimension(Pin<Dimension>),
    /// A dimension fixed to a constant; never uses a reference view
    Fixed {
        dimension: Dimension,
        relation: ConstantRelation,
    },
}

impl Descriptor {
    pub fn top(relation: Relation) -> Self {
        Descriptor::Vertical(Pin::matching(VerticalEdge::Top, relation))
    }

    pub fn bottom(relation: Relation) -> Self {
        Descriptor::Vertical(Pin::matching(VerticalEdge::Bottom, relation))
    }

    pub fn center_y(relation: Relation) -> Self {
        Descriptor::Vertical(Pin::matching(VerticalEdge::CenterY, relation))
    }

    pub fn leading(relation: Relation) -> Self {
        Descriptor::Horizontal(Pin::matching(HorizontalEdge::Leading, relation))
    }

    pub fn trailing(relation: Relation) -> Self {
        Descriptor::Horizontal(Pin::matching(HorizontalEdge::Trailing, relation))
    }

    pub fn center_x(relation: Relation) -> Self {
        Descriptor::Horizontal(Pin::matching(HorizontalEdge::CenterX, relation))
    }

    /// Height relative to the reference's height
    pub fn height_to(relation: Relation) -> Self {
        Descriptor::Dimension(Pin::matching(Dimension::Height, relation))
    }

    /// Width relative to the reference's width
    pub fn width_to(relation: Relation) -> Self {
        Descriptor::Dimension(Pin::matching(Dimension::Width, relation))
    }

    pub fn height(value: f64) -> Self {
        Self::fixed(Dimension::Height, ConstantRelation::EqualToConstant(value))
    }

    pub fn width(value: f64) -> Self {
        Self::fixed(Dimension::Width, ConstantRelation::EqualToConstant(value))
    }

    pub fn vertical(anchor: VerticalEdge, relation: Relation, target: VerticalEdge) -> Self {
        Descriptor::Vertical(Pin::new(anchor, relation, target))
    }

    pub fn horizontal(anchor: HorizontalEdge, relation: Relation, target: HorizontalEdge) -> Self {
        Descriptor::Horizontal(Pin::new(anchor, relation, target))
    }

    pub fn dimension(anchor: Dimension, relation: Relation, target: Dimension) -> Self {
        Descriptor::Dimension(Pin::new(anchor, relation, target))
    }

    pub fn fixed(dimension: Dimension, relation: ConstantRelation) -> Self {
        Descriptor::Fixed {
            dimension,
            relation,
        }
    }

    /// Build an edge pin from untyped edges, rejecting cross-axis pairs.
    /// A missing target pins to the same edge of the reference.
    pub fn edge(edge: Edge, relation: Relation, target: Option<Edge>) -> Result<Self, PinError> {
        let target = target.unwrap_or(edge);
        let mismatch = || PinError::axis_mismatch(edge.into(), target.into());

        match edge.axis() {
            Axis::Vertical => Ok(Self::vertical(
                VerticalEdge::try_from(edge).map_err(|_| mismatch())?,
                relation,
                VerticalEdge::try_from(target).map_err(|_| mismatch())?,
            )),
            Axis::Horizontal => Ok(Self::horizontal(
                HorizontalEdge::try_from(edge).map_err(|_| mismatch())?,
                relation,
                HorizontalEdge::try_from(target).map_err(|_| mismatch())?,
            )),
            Axis::Size => Err(mismatch()),
        }
    }

    /// Build a pin from untyped anchors, as read from a scene file
    pub fn from_attributes(
        anchor: Attribute,
        relation: Relation,
        target: Option<Attribute>,
    ) -> Result<Self, PinError> {
        let target_attr = target.unwrap_or(anchor);
        if let (Ok(a), Ok(t)) = (Dimension::try_from(anchor), Dimension::try_from(target_attr)) {
            return Ok(Self::dimension(a, relation, t));
        }
        match (Edge::try_from(anchor), Edge::try_from(target_attr)) {
            (Ok(a), Ok(t)) => Self::edge(a, relation, Some(t)),
            _ => Err(PinError::axis_mismatch(anchor, target_attr)),
        }
    }

    /// Fix an anchor to a constant, rejecting edges
    pub fn constant(anchor: Attribute, relation: ConstantRelation) -> Result<Self, PinError> {
        Dimension::try_from(anchor)
            .map(|d| Self::fixed(d, relation))
            .map_err(|_| PinError::ConstantOnEdge { anchor })
    }

    /// The subject anchor this descriptor constrains
    pub fn anchor(&self) -> Attribute {
        match self {
            Descriptor::Vertical(p) => p.anchor.attribute(),
            Descriptor::Horizontal(p) => p.anchor.attribute(),
            Descriptor::Dimension(p) => p.anchor.attribute(),
            Descriptor::Fixed { dimension, .. } => dimension.attribute(),
        }
    }
}

/// Four-sided padding, as used by fill
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Top/bottom and leading/trailing pairs
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// The four edge pins that fill a reference with this padding.
    /// Bottom and trailing offsets are negated since they measure inward.
    pub fn fill_descriptors(&self) -> Vec<Descriptor> {
        vec![
            Descriptor::top(Relation::EqualTo(self.top)),
            Descriptor::bottom(Relation::EqualTo(-self.bottom)),
            Descriptor::leading(Relation::EqualTo(self.leading)),
            Descriptor::trailing(Relation::EqualTo(-self.trailing)),
        ]
    }
}
