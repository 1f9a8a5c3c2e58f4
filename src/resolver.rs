//! Resolution of descriptors into constraint requests
//!
//! Resolution is pure: it binds a descriptor's anchors to concrete view
//! handles and picks the comparison operator. Nothing is created in the host
//! until the activator hands the requests over.

use std::fmt;

use crate::descriptor::{AnchorKind, Attribute, Descriptor, Pin, Relation};
use crate::error::PinError;
use crate::host::ViewId;

/// One anchor of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorRef {
    pub view: ViewId,
    pub attribute: Attribute,
}

impl AnchorRef {
    pub fn new(view: ViewId, attribute: impl Into<Attribute>) -> Self {
        Self {
            view,
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.view, self.attribute)
    }
}

/// Comparison operator of a resolved constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
        }
    }
}

impl From<Relation> for Operator {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::EqualTo(_) => Operator::Equal,
            Relation::AtLeast(_) => Operator::GreaterOrEqual,
            Relation::AtMost(_) => Operator::LessOrEqual,
        }
    }
}

/// `subject <operator> reference + constant`, or `subject <operator> constant`
/// when there is no reference anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintRequest {
    pub subject: AnchorRef,
    pub reference: Option<AnchorRef>,
    pub operator: Operator,
    pub constant: f64,
}

impl ConstraintRequest {
    /// Render as `a == b + c`, naming anchors with `label`
    pub fn render(&self, label: impl Fn(AnchorRef) -> String) -> String {
        let head = format!("{} {}", label(self.subject), self.operator.symbol());
        let c = self.constant;
        match self.reference {
            Some(reference) if c == 0.0 => format!("{} {}", head, label(reference)),
            Some(reference) if c < 0.0 => format!("{} {} - {}", head, label(reference), -c),
            Some(reference) => format!("{} {} + {}", head, label(reference), c),
            None => format!("{} {}", head, c),
        }
    }
}

impl fmt::Display for ConstraintRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|anchor| anchor.to_string()))
    }
}

/// Resolve a single descriptor against a subject and an optional reference.
///
/// Fixed dimensions ignore the reference. Every other descriptor fails with
/// [`PinError::MissingReference`] when no reference is given. Offsets and
/// constants must be finite.
pub fn resolve(
    descriptor: &Descriptor,
    subject: ViewId,
    reference: Option<ViewId>,
) -> Result<ConstraintRequest, PinError> {
    let anchor = descriptor.anchor();
    let require = || reference.ok_or(PinError::MissingReference { anchor });

    let request = match descriptor {
        Descriptor::Vertical(pin) => resolve_pin(pin, subject, require()?),
        Descriptor::Horizontal(pin) => resolve_pin(pin, subject, require()?),
        Descriptor::Dimension(pin) => resolve_pin(pin, subject, require()?),
        Descriptor::Fixed {
            dimension,
            relation,
        } => ConstraintRequest {
            subject: AnchorRef::new(subject, dimension.attribute()),
            reference: None,
            operator: Operator::Equal,
            constant: relation.value(),
        },
    };
    PinError::check_finite(anchor, request.constant)?;
    Ok(request)
}

/// Both anchors of a pin share the axis `A`, so the pair is valid by construction
fn resolve_pin<A: AnchorKind>(pin: &Pin<A>, subject: ViewId, reference: ViewId) -> ConstraintRequest {
    ConstraintRequest {
        subject: AnchorRef::new(subject, pin.anchor.attribute()),
        reference: Some(AnchorRef::new(reference, pin.target.attribute())),
        operator: pin.relation.into(),
        constant: pin.relation.offset(),
    }
}

/// Resolve a batch in order. Failures carry the descriptor's position.
pub fn resolve_all<'a>(
    descriptors: impl IntoIterator<Item = &'a Descriptor>,
    subject: ViewId,
    reference: Option<ViewId>,
) -> Result<Vec<ConstraintRequest>, PinError> {
    descriptors
        .into_iter()
        .enumerate()
        .map(|(index, d)| resolve(d, subject, reference).map_err(|e| e.at(index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Dimension, EdgeInsets, HorizontalEdge, VerticalEdge};

    const CHILD: ViewId = ViewId(1);
    const PARENT: ViewId = ViewId(0);

    #[test]
    fn test_relation_kind_and_offset_preserved() {
        let relations = [
            (Relation::EqualTo(3.0), Operator::Equal),
            (Relation::AtLeast(-2.5), Operator::GreaterOrEqual),
            (Relation::AtMost(12.0), Operator::LessOrEqual),
        ];
        for (relation, operator) in relations {
            for descriptor in [
                Descriptor::top(relation),
                Descriptor::trailing(relation),
                Descriptor::center_x(relation),
                Descriptor::width_to(relation),
            ] {
                let request = resolve(&descriptor, CHILD, Some(PARENT)).unwrap();
                assert_eq!(request.operator, operator);
                assert_eq!(request.constant, relation.offset());
                assert_eq!(request.subject.view, CHILD);
                assert_eq!(request.reference.map(|r| r.view), Some(PARENT));
            }
        }
    }

    #[test]
    fn test_center_resolves_to_center_anchors() {
        let x = resolve(&Descriptor::center_x(Relation::equal()), CHILD, Some(PARENT)).unwrap();
        assert_eq!(x.subject.attribute, Attribute::CenterX);
        assert_eq!(x.reference.unwrap().attribute, Attribute::CenterX);

        let y = resolve(&Descriptor::center_y(Relation::equal()), CHILD, Some(PARENT)).unwrap();
        assert_eq!(y.subject.attribute, Attribute::CenterY);
        assert_eq!(y.reference.unwrap().attribute, Attribute::CenterY);
    }

    #[test]
    fn test_cross_anchor_pin() {
        let d = Descriptor::vertical(VerticalEdge::Top, Relation::EqualTo(4.0), VerticalEdge::Bottom);
        let request = resolve(&d, CHILD, Some(PARENT)).unwrap();
        assert_eq!(request.subject, AnchorRef::new(CHILD, Attribute::Top));
        assert_eq!(request.reference, Some(AnchorRef::new(PARENT, Attribute::Bottom)));

        let d = Descriptor::horizontal(
            HorizontalEdge::Leading,
            Relation::equal(),
            HorizontalEdge::Trailing,
        );
        let request = resolve(&d, CHILD, Some(PARENT)).unwrap();
        assert_eq!(request.reference.unwrap().attribute, Attribute::Trailing);
    }

    #[test]
    fn test_fixed_dimension_ignores_reference() {
        let d = Descriptor::height(44.0);
        for reference in [None, Some(PARENT), Some(ViewId(7))] {
            let request = resolve(&d, CHILD, reference).unwrap();
            assert_eq!(request.reference, None);
            assert_eq!(request.operator, Operator::Equal);
            assert_eq!(request.constant, 44.0);
            assert_eq!(request.subject, AnchorRef::new(CHILD, Dimension::Height.attribute()));
        }
    }

    #[test]
    fn test_missing_reference_reports_position() {
        let pins = [Descriptor::width(10.0), Descriptor::top(Relation::equal())];
        let err = resolve_all(&pins, CHILD, None).unwrap_err();
        assert_eq!(err.index(), Some(1));
        match err {
            PinError::Descriptor { source, .. } => assert!(matches!(
                *source,
                PinError::MissingReference {
                    anchor: Attribute::Top
                }
            )),
            other => panic!("expected descriptor error, got {:?}", other),
        }
    }

    #[test]
    fn test_fill_resolves_to_four_requests() {
        let pins = EdgeInsets::uniform(8.0).fill_descriptors();
        let requests = resolve_all(&pins, CHILD, Some(PARENT)).unwrap();
        let summary: Vec<(Attribute, f64)> = requests
            .iter()
            .map(|r| (r.subject.attribute, r.constant))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Attribute::Top, 8.0),
                (Attribute::Bottom, -8.0),
                (Attribute::Leading, 8.0),
                (Attribute::Trailing, -8.0),
            ]
        );
        assert!(requests.iter().all(|r| r.operator == Operator::Equal));
    }

    #[test]
    fn test_non_finite_offsets_rejected() {
        let pins = [
            Descriptor::top(Relation::EqualTo(f64::INFINITY)),
            Descriptor::width(f64::NAN),
            Descriptor::leading(Relation::AtMost(f64::NEG_INFINITY)),
        ];
        for pin in &pins {
            let err = resolve(pin, CHILD, Some(PARENT)).unwrap_err();
            assert!(matches!(err, PinError::NonFinite { .. }), "{:?}", err);
        }

        let err = resolve_all(&EdgeInsets::uniform(f64::NAN).fill_descriptors(), CHILD, Some(PARENT))
            .unwrap_err();
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn test_render_with_custom_labels() {
        let request = resolve(&Descriptor::bottom(Relation::AtMost(-4.0)), CHILD, Some(PARENT)).unwrap();
        let names = |anchor: AnchorRef| {
            let view = if anchor.view == CHILD { "badge" } else { "card" };
            format!("{}.{}", view, anchor.attribute)
        };
        assert_eq!(request.render(names), "badge.bottom <= card.bottom - 4");
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let d = Descriptor::leading(Relation::AtLeast(16.0));
        assert_eq!(
            resolve(&d, CHILD, Some(PARENT)).unwrap(),
            resolve(&d, CHILD, Some(PARENT)).unwrap()
        );
    }

    #[test]
    fn test_display() {
        let top = resolve(&Descriptor::top(Relation::EqualTo(8.0)), CHILD, Some(PARENT)).unwrap();
        assert_eq!(top.to_string(), "view#1.top == view#0.top + 8");

        let bottom =
            resolve(&Descriptor::bottom(Relation::AtMost(-8.0)), CHILD, Some(PARENT)).unwrap();
        assert_eq!(bottom.to_string(), "view#1.bottom <= view#0.bottom - 8");

        let height = resolve(&Descriptor::height(44.0), CHILD, None).unwrap();
        assert_eq!(height.to_string(), "view#1.height == 44");
    }
}
