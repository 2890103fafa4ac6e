use crate::formula::{Clause, Formula, Literal, Variable};

/// The pigeonhole formula for `pigeons` pigeons and `pigeons - 1` holes, which is unsatisfiable
/// for every `pigeons >= 2`.
///
/// Variable `i * holes + j + 1` means pigeon `i` sits in hole `j`. Every pigeon must sit in some
/// hole, and no hole may hold two pigeons.
pub fn pigeonhole(pigeons: usize) -> Formula {
    let holes = pigeons.saturating_sub(1);
    let var = |pigeon: usize, hole: usize| Variable(pigeon * holes + hole + 1);

    let mut clauses = Vec::new();
    for pigeon in 0..pigeons {
        clauses.push(Clause::new((0..holes).map(|hole| Literal::Positive(var(pigeon, hole)))));
    }
    for hole in 0..holes {
        for first in 0..pigeons {
            for second in first + 1..pigeons {
                clauses.push(Clause::new(vec![
                    Literal::Negative(var(first, hole)),
                    Literal::Negative(var(second, hole)),
                ]));
            }
        }
    }

    Formula::new(pigeons * holes, clauses)
}
