//! A deliberately naive SAT solver: chronological backtracking over variables `1..=n` in
//! order, trying `true` before `false`, and rechecking every clause after each assignment.
//! There is no propagation and no learning; the only pruning is dropping a branch once some
//! clause has all of its literals assigned false.

mod assignment;
pub mod formula;
mod solver;

#[cfg(test)]
mod brute_force;

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable,
    Unsatisfiable,
}

pub use assignment::{Assignment, Value};
pub use formula::{Clause, Formula, Literal, Variable};
pub use solver::{Solver, SolverConfig, SolverStats, Strategy};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::dimacs::parse;
    use test_env_log::test;

    fn solve_dimacs(cnf: &str) -> (SatResult, Vec<Value>) {
        let (_, f) = parse(cnf.as_bytes()).expect("failed to parse");
        let mut solver = Solver::new(f);
        let result = solver.solve();
        (result, solver.assignment().values().map(|(_, v)| v).collect())
    }

    #[test]
    fn one_variable_one_clause() {
        assert_eq!(solve_dimacs("p cnf 1 1\n1 0\n"), (SatResult::Satisfiable, vec![Value::True]));
    }

    #[test]
    fn one_variable_contradiction() {
        assert_eq!(
            solve_dimacs("p cnf 1 2\n1 0\n-1 0\n"),
            (SatResult::Unsatisfiable, vec![Value::Unassigned])
        );
    }

    #[test]
    fn two_variables_exclusive_or() {
        assert_eq!(
            solve_dimacs("p cnf 2 2\n1 2 0\n-1 -2 0\n"),
            (SatResult::Satisfiable, vec![Value::True, Value::False])
        );
    }

    #[test]
    fn pigeonhole_from_dimacs() {
        let mut text = vec![];
        formula::dimacs::write(&formula::pigeonhole(4), &mut text).unwrap();
        let (result, values) = solve_dimacs(std::str::from_utf8(&text).unwrap());
        assert_eq!(result, SatResult::Unsatisfiable);
        assert!(values.iter().all(|v| *v == Value::Unassigned));
    }
}
