use crate::assignment::{Assignment, Value};
use crate::formula::{Formula, Variable};
use crate::SatResult;
use log::{debug, trace};

/// How the search tree is walked. Both strategies visit branches in the same order and leave
/// the same assignment and statistics behind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Explicit stack of per-variable frames; native stack usage does not grow with the formula.
    Iterative,
    /// One native call frame per variable.
    Recursive,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Iterative
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct SolverConfig {
    pub strategy: Strategy,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct SolverStats {
    /// Values tried, counting each polarity of each variable separately.
    pub decisions: u64,
    pub consistency_checks: u64,
    /// Variables reset to unassigned after both polarities failed.
    pub backtracks: u64,
}

/// The next thing to try for the variable at a given depth.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    TryTrue,
    TryFalse,
    Exhausted,
}

/// Chronological backtracking search: variables are assigned in increasing order, `true`
/// before `false`, and the whole formula is rechecked after every assignment.
pub struct Solver {
    formula: Formula,
    assignment: Assignment,
    config: SolverConfig,
    stats: SolverStats,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self::with_config(formula, SolverConfig::default())
    }

    pub fn with_config(formula: Formula, config: SolverConfig) -> Self {
        let assignment = Assignment::new(formula.num_variables());
        Self {
            formula,
            assignment,
            config,
            stats: SolverStats::default(),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// After a satisfiable result this is a total model; after an unsatisfiable one every
    /// variable is unassigned.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn model(&self) -> Option<&Assignment> {
        if self.assignment.is_total() && self.formula.is_satisfied_by(&self.assignment) {
            Some(&self.assignment)
        } else {
            None
        }
    }

    /// Statistics for the most recent call to [`Solver::solve`].
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn solve(&mut self) -> SatResult {
        self.assignment.clear();
        self.stats = SolverStats::default();

        let satisfiable = if self.formula.num_variables() == 0 {
            // no variable assignment will ever check the clauses, so check them once here
            self.stats.consistency_checks += 1;
            self.formula.is_consistent(&self.assignment)
        } else {
            match self.config.strategy {
                Strategy::Iterative => self.search_iterative(),
                Strategy::Recursive => self.search_recursive(1),
            }
        };

        debug!(
            "{:?} search finished: {} decisions, {} consistency checks, {} backtracks",
            self.config.strategy, self.stats.decisions, self.stats.consistency_checks, self.stats.backtracks
        );

        if satisfiable {
            debug_assert!(self.assignment.is_total());
            SatResult::Satisfiable
        } else {
            debug_assert!(self.assignment.is_empty());
            SatResult::Unsatisfiable
        }
    }

    /// Assigns `value` to `var` and reports whether the formula is still consistent.
    fn try_assign(&mut self, var: Variable, value: Value) -> bool {
        trace!("var {} => {:?}", var.0, value);
        self.assignment[var] = value;
        self.stats.decisions += 1;
        self.stats.consistency_checks += 1;
        self.formula.is_consistent(&self.assignment)
    }

    fn reset(&mut self, var: Variable) {
        trace!("reset var {}", var.0);
        self.assignment[var] = Value::Unassigned;
        self.stats.backtracks += 1;
    }

    fn search_recursive(&mut self, depth: usize) -> bool {
        if depth > self.formula.num_variables() {
            return true;
        }
        let var = Variable(depth);

        if self.try_assign(var, Value::True) && self.search_recursive(depth + 1) {
            return true;
        }
        if self.try_assign(var, Value::False) && self.search_recursive(depth + 1) {
            return true;
        }

        self.reset(var);
        false
    }

    fn search_iterative(&mut self) -> bool {
        let num_variables = self.formula.num_variables();
        // frames[k] is where to resume variable k + 1 once everything below it fails
        let mut frames: Vec<Phase> = Vec::with_capacity(num_variables);
        let mut depth = 1;
        let mut phase = Phase::TryTrue;

        loop {
            if depth > num_variables {
                return true;
            }
            let var = Variable(depth);

            match phase {
                Phase::TryTrue => {
                    if self.try_assign(var, Value::True) {
                        frames.push(Phase::TryFalse);
                        depth += 1;
                    } else {
                        phase = Phase::TryFalse;
                        continue;
                    }
                }
                Phase::TryFalse => {
                    if self.try_assign(var, Value::False) {
                        frames.push(Phase::Exhausted);
                        depth += 1;
                    } else {
                        phase = Phase::Exhausted;
                        continue;
                    }
                }
                Phase::Exhausted => {
                    self.reset(var);
                    match frames.pop() {
                        Some(resume) => {
                            depth -= 1;
                            phase = resume;
                            continue;
                        }
                        None => return false,
                    }
                }
            }
            phase = Phase::TryTrue;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Strategy;
    use crate::brute_force::solve_brute_force;
    use crate::formula::{formula_strategy, n, p, pigeonhole, Clause, Literal};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_env_log::test;

    const BOTH: [Strategy; 2] = [Strategy::Iterative, Strategy::Recursive];

    fn solver(formula: Formula, strategy: Strategy) -> Solver {
        Solver::with_config(formula, SolverConfig { strategy })
    }

    fn values(solver: &Solver) -> Vec<Value> {
        solver.assignment().values().map(|(_, v)| v).collect()
    }

    #[test]
    fn single_positive_unit() {
        for &strategy in &BOTH {
            let f = Formula::new(1, vec![Clause::new(vec![p(1)])]);
            let mut solver = solver(f, strategy);
            assert_eq!(solver.solve(), SatResult::Satisfiable);
            assert_eq!(values(&solver), vec![Value::True]);
        }
    }

    #[test]
    fn contradictory_units() {
        for &strategy in &BOTH {
            let f = Formula::new(1, vec![Clause::new(vec![p(1)]), Clause::new(vec![n(1)])]);
            let mut solver = solver(f, strategy);
            assert_eq!(solver.solve(), SatResult::Unsatisfiable);
            assert!(solver.assignment().is_empty());
            assert_eq!(solver.model(), None);
        }
    }

    #[test]
    fn exactly_one_of_two() {
        for &strategy in &BOTH {
            let f = Formula::new(2, vec![Clause::new(vec![p(1), p(2)]), Clause::new(vec![n(1), n(2)])]);
            let mut solver = solver(f, strategy);
            assert_eq!(solver.solve(), SatResult::Satisfiable);
            assert_eq!(values(&solver), vec![Value::True, Value::False]);
        }
    }

    #[test]
    fn empty_formula() {
        for k in 0..5 {
            for &strategy in &BOTH {
                let mut solver = solver(Formula::new(k, vec![]), strategy);
                assert_eq!(solver.solve(), SatResult::Satisfiable);
                // nothing constrains the search, so every variable takes its first polarity
                assert_eq!(values(&solver), vec![Value::True; k]);
            }
        }
    }

    #[test]
    fn empty_clause() {
        for k in 0..5 {
            for &strategy in &BOTH {
                let f = Formula::new(k, vec![Clause::new(vec![]), Clause::new(vec![])]);
                let mut solver = solver(f, strategy);
                assert_eq!(solver.solve(), SatResult::Unsatisfiable);
                assert!(solver.assignment().is_empty());
            }
        }
    }

    #[test]
    fn solve_conflict_sat() {
        let c1 = Clause::new(vec![p(1), p(2), p(3)]);
        let c2 = Clause::new(vec![n(1), n(2), p(3)]);
        let c3 = Clause::new(vec![n(2), n(3)]);
        let f = Formula::new(3, vec![c1, c2, c3]);

        let mut solver = Solver::new(f);
        assert_eq!(solver.solve(), SatResult::Satisfiable);
        // 1=T 2=T fails c2/c3 either way, 1=T 2=F 3=T is the first model in search order
        assert_eq!(values(&solver), vec![Value::True, Value::False, Value::True]);
        assert!(solver.model().is_some());
    }

    #[test]
    fn no_early_pruning_on_unit_clauses() {
        // (2 | 3) & !2 & !3 becomes unit after 2 = F, but the conflict is only seen once 3 is
        // assigned as well
        let f = Formula::new(
            3,
            vec![Clause::new(vec![p(2), p(3)]), Clause::new(vec![n(2)]), Clause::new(vec![n(3)])],
        );
        let mut solver = Solver::new(f);
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(
            *solver.stats(),
            SolverStats {
                decisions: 10,
                consistency_checks: 10,
                backtracks: 5,
            }
        );
    }

    #[test]
    fn pigeonhole_unsat() {
        // consistency checks for 2..=6 pigeons under the fixed variable and polarity order
        let expected_checks = [4, 28, 196, 1564, 14404];
        let mut previous = 0;
        for (pigeons, &expected) in (2..=6).zip(&expected_checks) {
            for &strategy in &BOTH {
                let mut solver = solver(pigeonhole(pigeons), strategy);
                assert_eq!(solver.solve(), SatResult::Unsatisfiable, "{} pigeons", pigeons);
                assert!(solver.assignment().is_empty());
                assert_eq!(solver.stats().consistency_checks, expected, "{} pigeons", pigeons);
            }
            assert!(expected > 2 * previous);
            previous = expected;
        }
    }

    #[test]
    fn resolving_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let num_vars = rng.gen_range(1, 9);
            let mut clauses = vec![];
            for _ in 0..rng.gen_range(0, 20) {
                let mut literals = vec![];
                for _ in 0..rng.gen_range(1, 4) {
                    let var = Variable(rng.gen_range(1, num_vars + 1));
                    literals.push(if rng.gen() { Literal::Positive(var) } else { Literal::Negative(var) });
                }
                clauses.push(Clause::new(literals));
            }
            let f = Formula::new(num_vars, clauses);

            let mut solver = Solver::new(f);
            let first = solver.solve();
            let first_assignment = solver.assignment().clone();
            let first_stats = *solver.stats();

            assert_eq!(solver.solve(), first);
            assert_eq!(*solver.assignment(), first_assignment);
            assert_eq!(*solver.stats(), first_stats);
        }
    }

    #[test]
    fn deep_search_iterative() {
        let num_vars = 100_000;
        let f = Formula::new(num_vars, vec![Clause::new(vec![n(num_vars)])]);
        let mut solver = Solver::new(f);
        assert_eq!(solver.solve(), SatResult::Satisfiable);
        assert_eq!(solver.assignment()[Variable(1)], Value::True);
        assert_eq!(solver.assignment()[Variable(num_vars)], Value::False);
        assert_eq!(solver.stats().decisions as usize, num_vars + 1);
    }

    proptest! {
        #[test]
        fn proptest_solve(f in formula_strategy(10)) {
            let brute_force = solve_brute_force(&f);
            for &strategy in &BOTH {
                let mut solver = solver(f.clone(), strategy);
                let result = solver.solve();
                log::trace!("{:?}: result = {:?}", strategy, result);
                prop_assert_eq!(result.clone(), brute_force.clone());
                match result {
                    SatResult::Satisfiable => {
                        prop_assert!(solver.assignment().is_total());
                        prop_assert!(f.is_satisfied_by(solver.assignment()));
                    }
                    SatResult::Unsatisfiable => prop_assert!(solver.assignment().is_empty()),
                }
            }
        }

        #[test]
        fn proptest_strategies_agree(f in formula_strategy(10)) {
            let mut iterative = solver(f.clone(), Strategy::Iterative);
            let mut recursive = solver(f, Strategy::Recursive);
            prop_assert_eq!(iterative.solve(), recursive.solve());
            prop_assert_eq!(iterative.assignment(), recursive.assignment());
            prop_assert_eq!(iterative.stats(), recursive.stats());
        }
    }
}
