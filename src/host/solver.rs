//! Constraint solver integration for the view tree
//!
//! Thin wrapper around the kasuari Cassowary solver: batches of constraints
//! are added all-or-nothing, and solved values are cached from the solver's
//! change feed so every variable has a readable value.

use std::collections::HashMap;

use kasuari::{Constraint, Solver as KasuariSolver, Variable};
use thiserror::Error;

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint {constraint}: conflicts with active constraints")]
    Unsatisfiable { constraint: String },

    #[error("constraint {constraint} is already active")]
    Duplicate { constraint: String },

    #[error("constraint {constraint} is not active")]
    NotActive { constraint: String },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// A constraint together with a human-readable description for errors
pub type Described<'a> = (&'a Constraint, &'a str);

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Last known value of every variable reported by the solver
    values: HashMap<Variable, f64>,
    active: usize,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            values: HashMap::new(),
            active: 0,
        }
    }

    /// Number of constraints currently in the solver
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(e: kasuari::AddConstraintError, desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                constraint: desc.to_string(),
            },
            kasuari::AddConstraintError::DuplicateConstraint => SolverError::Duplicate {
                constraint: desc.to_string(),
            },
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("adding {}: {}", desc, msg))
            }
        }
    }

    /// Add every constraint of the batch, or none of them.
    ///
    /// On failure the constraints of this batch that were already added are
    /// removed again before the error is returned.
    pub fn add_batch(&mut self, batch: &[Described<'_>]) -> Result<(), SolverError> {
        for (added, (constraint, desc)) in batch.iter().enumerate() {
            if let Err(e) = self.solver.add_constraint((*constraint).clone()) {
                log::debug!(
                    "rolling back {} constraint(s) after failure on {}",
                    added,
                    desc
                );
                for (previous, _) in &batch[..added] {
                    // Just added, so removal cannot fail
                    let _ = self.solver.remove_constraint(previous);
                }
                self.active -= added;
                return Err(Self::convert_kasuari_error(e, desc));
            }
            self.active += 1;
        }
        Ok(())
    }

    pub fn contains(&self, constraint: &Constraint) -> bool {
        self.solver.has_constraint(constraint)
    }

    pub fn remove(&mut self, constraint: &Constraint, desc: &str) -> Result<(), SolverError> {
        if !self.solver.has_constraint(constraint) {
            return Err(SolverError::NotActive {
                constraint: desc.to_string(),
            });
        }
        self.solver
            .remove_constraint(constraint)
            .map_err(|e| SolverError::Internal(format!("removing {}: {:?}", desc, e)))?;
        self.active -= 1;
        Ok(())
    }

    /// Pull the latest solution into the value cache
    pub fn refresh(&mut self) {
        for &(var, value) in self.solver.fetch_changes() {
            self.values.insert(var, value);
        }
    }

    /// Cached value of a variable; variables the solver never moved are zero
    pub fn value(&self, var: Variable) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasuari::{Strength, WeightedRelation::*};

    #[test]
    fn test_equal_constraint() {
        let mut solver = ConstraintSolver::new();
        let a = Variable::new();
        let b = Variable::new();

        let fix_b = b | EQ(Strength::REQUIRED) | 50.0;
        let a_from_b = a | EQ(Strength::REQUIRED) | b + 20.0;
        solver
            .add_batch(&[(&fix_b, "b = 50"), (&a_from_b, "a = b + 20")])
            .unwrap();
        solver.refresh();

        assert!((solver.value(a) - 70.0).abs() < 0.001);
        assert!((solver.value(b) - 50.0).abs() < 0.001);
        assert_eq!(solver.active_count(), 2);
    }

    #[test]
    fn test_conflicting_batch_rolls_back() {
        let mut solver = ConstraintSolver::new();
        let x = Variable::new();

        let first = x | EQ(Strength::REQUIRED) | 100.0;
        solver.add_batch(&[(&first, "x = 100")]).unwrap();

        let width = Variable::new();
        let ok = width | GE(Strength::REQUIRED) | 10.0;
        let conflict = x | EQ(Strength::REQUIRED) | 200.0;
        let result = solver.add_batch(&[(&ok, "w >= 10"), (&conflict, "x = 200")]);

        match result {
            Err(SolverError::Unsatisfiable { constraint }) => assert_eq!(constraint, "x = 200"),
            other => panic!("expected Unsatisfiable, got {:?}", other),
        }
        assert_eq!(solver.active_count(), 1);

        // The rolled-back constraint can be added again on its own
        solver.add_batch(&[(&ok, "w >= 10")]).unwrap();
        assert_eq!(solver.active_count(), 2);
    }

    #[test]
    fn test_remove_restores_freedom() {
        let mut solver = ConstraintSolver::new();
        let x = Variable::new();

        let fixed = x | EQ(Strength::REQUIRED) | 100.0;
        solver.add_batch(&[(&fixed, "x = 100")]).unwrap();
        solver.remove(&fixed, "x = 100").unwrap();

        let other = x | EQ(Strength::REQUIRED) | 200.0;
        solver.add_batch(&[(&other, "x = 200")]).unwrap();
        solver.refresh();
        assert!((solver.value(x) - 200.0).abs() < 0.001);

        assert!(matches!(
            solver.remove(&fixed, "x = 100"),
            Err(SolverError::NotActive { .. })
        ));
    }

    #[test]
    fn test_redundant_equalities_accumulate() {
        let mut solver = ConstraintSolver::new();
        let a = Variable::new();
        let b = Variable::new();

        let first = a | EQ(Strength::REQUIRED) | b + 8.0;
        let second = a | EQ(Strength::REQUIRED) | b + 8.0;
        solver
            .add_batch(&[(&first, "a = b + 8"), (&second, "a = b + 8")])
            .unwrap();
        assert_eq!(solver.active_count(), 2);
    }
}
