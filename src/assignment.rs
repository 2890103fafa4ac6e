use crate::formula::{Literal, Variable};
use std::fmt::{self, Display, Formatter};
use std::ops::{Index, IndexMut};

/// The state of a single variable in a partial assignment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Value {
    True,
    False,
    Unassigned,
}

impl Value {
    /// True iff the variable is assigned and its value is `polarity`.
    #[inline]
    pub fn matches(self, polarity: bool) -> bool {
        match self {
            Value::True => polarity,
            Value::False => !polarity,
            Value::Unassigned => false,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Value::Unassigned
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Unassigned
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }
}

/// A partial assignment over variables `1..=num_variables`. Slot 0 exists only so variables
/// index directly and is never read or written.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    values: Vec<Value>,
}

impl Assignment {
    pub fn new(num_variables: usize) -> Self {
        Self {
            values: vec![Value::Unassigned; num_variables + 1],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len() - 1
    }

    /// Values of variables `1..=num_variables`, in order.
    pub fn values(&self) -> impl Iterator<Item = (Variable, Value)> + '_ {
        self.values.iter().enumerate().skip(1).map(|(i, v)| (Variable(i), *v))
    }

    pub fn is_total(&self) -> bool {
        self.values().all(|(_, v)| v.is_assigned())
    }

    pub fn is_empty(&self) -> bool {
        self.values().all(|(_, v)| !v.is_assigned())
    }

    /// The assigned variables as literals, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values().filter_map(|(var, value)| match value {
            Value::True => Some(Literal::Positive(var)),
            Value::False => Some(Literal::Negative(var)),
            Value::Unassigned => None,
        })
    }

    pub(crate) fn clear(&mut self) {
        for value in &mut self.values {
            *value = Value::Unassigned;
        }
    }
}

impl Index<Variable> for Assignment {
    type Output = Value;

    #[inline]
    fn index(&self, var: Variable) -> &Value {
        assert_ne!(var.0, 0, "variable 0 does not exist");
        &self.values[var.0]
    }
}

impl IndexMut<Variable> for Assignment {
    #[inline]
    fn index_mut(&mut self, var: Variable) -> &mut Value {
        assert_ne!(var.0, 0, "variable 0 does not exist");
        &mut self.values[var.0]
    }
}

/// Renders the assigned variables as a DIMACS solution line, e.g. `v 1 -2 3 0`.
impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("v")?;
        for literal in self.literals() {
            write!(f, " {}", literal.to_dimacs())?;
        }
        f.write_str(" 0")
    }
}
