// src/simulation/mod.rs

//! Drives amplitude amplification for a CNF formula.
//!
//! [`Searcher`] compiles the oracle and diffuser, owns a fresh
//! [`SimulationEngine`] for the duration of one run, repeats
//! oracle + diffuser the configured number of times and samples the
//! variable register.

pub mod engine;
mod results;

pub use results::SearchResult;

use crate::circuits::diffuser::reflection_about_mean;
use crate::circuits::oracle::compile_oracle;
use crate::circuits::Circuit;
use crate::core::constants::grover_constants::{DEFAULT_MAX_QUBITS, DEFAULT_PARALLEL_THRESHOLD, PI};
use crate::core::{Formula, GroverError, RegisterLayout, AMPLITUDE_TOLERANCE, NORM_TOLERANCE};
use crate::validation::{validate_state, ValidationMode};
use engine::SimulationEngine;
use log::{debug, info, warn};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How many oracle + diffuser rounds to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationPolicy {
    /// `floor(π/4 · √(2^n))`, optimal for exactly one marked assignment.
    SingleMarked,
    /// Counts the assignments the oracle marks on the uniform superposition and
    /// uses `floor(π/4 · √(2^n / M))`. Identical to `SingleMarked` when `M = 1`.
    #[default]
    Estimated,
    /// A caller-chosen round count.
    Fixed(usize),
}

/// Settings for a [`Searcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest register `Q = n + m + 1` the searcher will allocate.
    pub max_qubits: usize,
    /// Sampling seed. `None` derives one from the final amplitude vector,
    /// so identical runs still sample identically.
    pub seed: Option<u64>,
    pub iterations: IterationPolicy,
    pub validation: ValidationMode,
    pub norm_tolerance: f64,
    /// Registers at least this wide apply gates on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
            iterations: IterationPolicy::default(),
            validation: ValidationMode::default(),
            norm_tolerance: NORM_TOLERANCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Shared flag for stopping a running search from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// `floor(π/4 · √(2^n))`: the optimal round count for one marked state among `2^n`.
pub fn iteration_count(n: usize) -> usize {
    (PI / 4.0 * (n as f64).exp2().sqrt()).floor() as usize
}

/// Round count for `marked` solutions among `2^n` assignments.
///
/// Falls back to [`iteration_count`] when nothing is marked (any count is
/// equally useless then) and returns 0 once half or more of the space is
/// marked, where a round can only lower the success probability.
pub fn iteration_count_for(n: usize, marked: u64) -> usize {
    let total = (n as f64).exp2();
    if marked == 0 {
        return iteration_count(n);
    }
    if 2.0 * marked as f64 >= total {
        return 0;
    }
    (PI / 4.0 * (total / marked as f64).sqrt()).floor() as usize
}

/// Oracle, reflection and layout for one formula.
#[derive(Debug, Clone)]
pub struct CompiledSearch {
    pub layout: RegisterLayout,
    pub oracle: Circuit,
    pub diffuser: Circuit,
}

/// The search controller.
///
/// Each call to [`Searcher::search`] allocates its own amplitude register and
/// drops it before returning; nothing is shared between runs.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config, cancel: None }
    }

    /// Lets `token` abort the run between amplification rounds.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Checks resource limits and compiles both circuits without allocating
    /// the amplitude vector.
    pub fn compile(&self, formula: &Formula) -> Result<CompiledSearch, GroverError> {
        let layout = RegisterLayout::for_formula(formula);
        layout.check_ceiling(self.config.max_qubits)?;

        let oracle = compile_oracle(formula)?;
        let diffuser = reflection_about_mean(layout.num_vars())?;
        oracle.validate(layout.num_qubits())?;
        diffuser.validate(layout.num_vars())?;
        debug!("oracle: {} gates, diffuser: {} gates", oracle.len(), diffuser.len());
        Ok(CompiledSearch { layout, oracle, diffuser })
    }

    /// Runs the amplification loop and returns the variable-register
    /// distribution, indexed by bit pattern, with the round count used.
    pub fn distribution(&self, formula: &Formula) -> Result<(Vec<f64>, usize), GroverError> {
        let compiled = self.compile(formula)?;
        let (engine, iterations) = self.amplify(&compiled)?;
        Ok((engine.marginal_probabilities(compiled.layout.num_vars()), iterations))
    }

    /// Samples `shots` independent outcomes of the amplified state.
    pub fn search(&self, formula: &Formula, shots: usize) -> Result<SearchResult, GroverError> {
        if shots == 0 {
            return Err(GroverError::degenerate("shot count must be at least 1"));
        }
        let compiled = self.compile(formula)?;
        let num_vars = compiled.layout.num_vars();
        info!(
            "searching {} variable(s), {} clause(s) on {} qubits, {} shots",
            num_vars,
            formula.num_clauses(),
            compiled.layout.num_qubits(),
            shots
        );

        let (engine, iterations) = self.amplify(&compiled)?;
        self.check_cancelled(iterations)?;

        let seed = self.config.seed.unwrap_or_else(|| seed_from_state(&engine));
        let probabilities = engine.marginal_probabilities(num_vars);
        drop(engine);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut result = SearchResult::new(num_vars, iterations, seed);
        for pattern in sample(&probabilities, shots, &mut rng) {
            result.record(pattern);
        }
        info!("search finished after {} iteration(s); {} distinct outcome(s)", iterations, result.counts().len());
        Ok(result)
    }

    /// Prepares the uniform superposition and applies the oracle/diffuser rounds.
    fn amplify(&self, compiled: &CompiledSearch) -> Result<(SimulationEngine, usize), GroverError> {
        let layout = &compiled.layout;
        let mut engine = SimulationEngine::init(layout.num_qubits(), self.config.parallel_threshold)?;
        engine.superpose(&layout.variable_qubits());

        let iterations = match self.config.iterations {
            IterationPolicy::SingleMarked => iteration_count(layout.num_vars()),
            IterationPolicy::Fixed(r) => r,
            IterationPolicy::Estimated => {
                let marked = count_marked(&mut engine, compiled);
                if marked == 0 {
                    warn!("oracle marks no assignment; the formula is unsatisfiable");
                } else if 2 * marked >= 1u64 << layout.num_vars() {
                    warn!("{} of {} assignments are marked; skipping amplification", marked, 1u64 << layout.num_vars());
                }
                iteration_count_for(layout.num_vars(), marked)
            }
        };
        debug!("running {} amplification round(s)", iterations);

        for round in 0..iterations {
            self.check_cancelled(round)?;
            engine.apply_circuit(&compiled.oracle);
            if self.config.validation == ValidationMode::PerCircuit {
                validate_state(engine.state(), Some(self.config.norm_tolerance))?;
            }
            engine.apply_circuit(&compiled.diffuser);
            if self.config.validation != ValidationMode::Off {
                validate_state(engine.state(), Some(self.config.norm_tolerance))?;
            }
            debug!("round {}/{} done", round + 1, iterations);
        }
        Ok((engine, iterations))
    }

    fn check_cancelled(&self, completed_iterations: usize) -> Result<(), GroverError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GroverError::Aborted { completed_iterations }),
            _ => Ok(()),
        }
    }
}

/// Runs a search with the default configuration.
pub fn search(formula: &Formula, shots: usize) -> Result<SearchResult, GroverError> {
    Searcher::default().search(formula, shots)
}

/// Applies the oracle once to the uniform superposition, counts the
/// phase-flipped variable patterns, then applies it again to undo the flip.
fn count_marked(engine: &mut SimulationEngine, compiled: &CompiledSearch) -> u64 {
    engine.apply_circuit(&compiled.oracle);
    let width = 1usize << compiled.layout.num_vars();
    let marked = engine.state().amplitudes()[..width].iter().filter(|a| a.re < -AMPLITUDE_TOLERANCE).count() as u64;
    engine.apply_circuit(&compiled.oracle);
    debug!("oracle marks {} of {} assignments", marked, width);
    marked
}

/// Deterministic seed derived from the final amplitudes.
fn seed_from_state(engine: &SimulationEngine) -> u64 {
    let mut hasher = DefaultHasher::new();
    for amp in engine.state().amplitudes() {
        amp.re.to_bits().hash(&mut hasher);
        amp.im.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Draws `shots` independent indices from `probabilities`; the distribution
/// is never updated between draws.
fn sample(probabilities: &[f64], shots: usize, rng: &mut StdRng) -> Vec<u64> {
    let mut cumulative = Vec::with_capacity(probabilities.len());
    let mut total = 0.0;
    for p in probabilities {
        total += p;
        cumulative.push(total);
    }
    let last = cumulative.len().saturating_sub(1);
    (0..shots)
        .map(|_| {
            let u: f64 = StandardUniform.sample(&mut *rng);
            let target = u * total;
            cumulative.partition_point(|&c| c <= target).min(last) as u64
        })
        .collect()
}
