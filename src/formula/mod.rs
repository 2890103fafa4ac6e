pub mod dimacs;
mod pigeonhole;

pub use pigeonhole::pigeonhole;

use crate::assignment::{Assignment, Value};
use std::fmt::Debug;
use std::fmt::{self, Display, Formatter};

/// A propositional variable, numbered from 1 as in DIMACS.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    /// Builds a literal from its DIMACS encoding. Returns `None` for the `0` terminator.
    pub fn from_dimacs(l: i64) -> Option<Self> {
        if l > 0 {
            Some(Literal::Positive(Variable(l as usize)))
        } else if l < 0 {
            Some(Literal::Negative(Variable(l.unsigned_abs() as usize)))
        } else {
            None
        }
    }

    pub fn to_dimacs(&self) -> i64 {
        match self {
            Literal::Positive(v) => v.0 as i64,
            Literal::Negative(v) => -(v.0 as i64),
        }
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    /// Whether this literal can still be true under `assignment`: either its variable is
    /// unassigned, or it is assigned the polarity the literal asks for.
    #[inline]
    pub fn is_satisfiable_under(&self, assignment: &Assignment) -> bool {
        match assignment[*self.variable()] {
            Value::Unassigned => true,
            value => value.matches(self.is_positive()),
        }
    }

    /// Whether `assignment` makes this literal true.
    pub fn is_true_under(&self, assignment: &Assignment) -> bool {
        assignment[*self.variable()].matches(self.is_positive())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "{}", x),
            Literal::Negative(Variable(x)) => write!(f, "!{}", x),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A clause is consistent with a partial assignment if some literal is still satisfiable.
    /// The empty clause never is.
    #[inline]
    pub fn is_consistent(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|l| l.is_satisfiable_under(assignment))
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|l| l.is_true_under(assignment))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.literals.len() != 1 {
            f.write_str("(")?;
        }
        let mut first_literal = true;
        for literal in &self.literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() != 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Formula {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Panics if a literal refers to a variable outside `1..=num_variables`.
    pub fn new(num_variables: usize, conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        for clause in &clauses {
            for literal in clause.literals() {
                assert!(
                    (1..=num_variables).contains(&literal.idx()),
                    "literal {} out of range for {} variables",
                    literal,
                    num_variables
                );
            }
        }
        Self { num_variables, clauses }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Checks the formula against a partial assignment, treating unassigned variables
    /// optimistically. Only a clause whose literals are all assigned and all false makes the
    /// formula inconsistent; the empty formula is always consistent.
    pub fn is_consistent(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| clause.is_consistent(assignment))
    }

    /// Whether `assignment` is a model: every clause has a literal made true by it.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(assignment))
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{} vars] {}", self.num_variables, self)
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// Random formulas over at most `max_vars` variables, for comparing the solver against brute force.
#[cfg(test)]
pub(crate) fn formula_strategy(max_vars: usize) -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1..=max_vars).prop_flat_map(|num_vars| {
        let literal = (1..=num_vars, any::<bool>()).prop_map(|(v, positive)| {
            if positive {
                Literal::Positive(Variable(v))
            } else {
                Literal::Negative(Variable(v))
            }
        });
        let clause = proptest::collection::vec(literal, 1..=3).prop_map(Clause::new);
        proptest::collection::vec(clause, 0..=12).prop_map(move |clauses| Formula::new(num_vars, clauses))
    })
}
