// tests/oracle_properties.rs

use grover_sat::circuits::diffuser::compile_diffuser;
use grover_sat::core::AmplitudeRegister;
use grover_sat::simulation::engine::SimulationEngine;
use grover_sat::{compile_oracle, Formula, RegisterLayout};
use proptest::prelude::*;

fn literal(max_var: i64) -> impl Strategy<Value = i64> {
    (1..=max_var, any::<bool>()).prop_map(|(v, negative)| if negative { -v } else { v })
}

fn formula_strategy() -> impl Strategy<Value = Vec<Vec<i64>>> {
    prop::collection::vec(prop::collection::vec(literal(4), 1..=3), 1..=3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn oracle_marks_exactly_the_solutions(clauses in formula_strategy()) {
        let formula = Formula::from_clauses(clauses).unwrap();
        let layout = RegisterLayout::for_formula(&formula);
        let oracle = compile_oracle(&formula).unwrap();

        for pattern in 0..(1usize << formula.num_vars()) {
            let start = AmplitudeRegister::basis(layout.num_qubits(), pattern);
            let mut engine = SimulationEngine::with_register(start, usize::MAX);
            engine.apply_circuit(&oracle);

            let expected = if formula.is_satisfied_by_pattern(pattern as u64) { -1.0 } else { 1.0 };
            let amp = engine.state().amplitudes()[pattern];
            prop_assert!((amp.re - expected).abs() < 1e-12, "pattern {:b}: {}", pattern, amp);
            prop_assert!(amp.im.abs() < 1e-12);
        }
    }

    #[test]
    fn oracle_leaves_work_qubits_clean(clauses in formula_strategy()) {
        let formula = Formula::from_clauses(clauses).unwrap();
        let layout = RegisterLayout::for_formula(&formula);
        let oracle = compile_oracle(&formula).unwrap();

        let mut engine = SimulationEngine::init(layout.num_qubits(), usize::MAX).unwrap();
        engine.superpose(&layout.variable_qubits());
        engine.apply_circuit(&oracle);

        let leaked: f64 = engine
            .state()
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(index, _)| index & !layout.variable_mask() != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();
        prop_assert!(leaked < 1e-12, "weight outside the variable register: {}", leaked);
    }

    #[test]
    fn diffuser_is_its_own_inverse(n in 2usize..=5, index in 0usize..32) {
        let diffuser = compile_diffuser(n).unwrap();
        let index = index % (1 << n);
        let mut engine = SimulationEngine::with_register(AmplitudeRegister::basis(n, index), usize::MAX);
        engine.apply_circuit(&diffuser);
        engine.apply_circuit(&diffuser);
        for (i, amp) in engine.state().amplitudes().iter().enumerate() {
            let expected = if i == index { 1.0 } else { 0.0 };
            prop_assert!((amp.re - expected).abs() < 1e-9 && amp.im.abs() < 1e-9);
        }
    }
}
