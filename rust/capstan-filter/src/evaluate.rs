//! Evaluating a filter against a single attribute map.

use crate::{Attributes, Filter, compare::compare};

impl Filter {
    /// Whether `attributes` satisfy this filter.
    ///
    /// A leaf naming an attribute that is absent never matches, so
    /// `(!(a=1))` holds for a map without `a`.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        match self {
            Filter::MatchAll => true,
            Filter::And(children) => children.iter().all(|child| child.matches(attributes)),
            Filter::Or(children) => children.iter().any(|child| child.matches(attributes)),
            Filter::Not(children) => !children.iter().any(|child| child.matches(attributes)),
            leaf => match leaf.predicate() {
                Some((name, predicate)) => attributes
                    .get(name)
                    .is_some_and(|stored| compare(stored, &predicate)),
                None => false,
            },
        }
    }
}
