// src/core/formula.rs

//! CNF formulas and truth assignments.

use super::error::GroverError;
use std::fmt;

/// A signed variable reference. The magnitude is the 1-based variable index
/// and the sign carries polarity (positive means unnegated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i64);

impl Literal {
    /// Creates a literal, rejecting `0` (the clause terminator in the text format).
    pub fn new(value: i64) -> Result<Self, GroverError> {
        if value == 0 {
            return Err(GroverError::malformed("literal magnitude must be non-zero"));
        }
        Ok(Self(value))
    }

    /// 1-based variable index.
    pub fn var(&self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// `true` for an unnegated literal.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The same variable with the opposite polarity.
    pub fn negated(&self) -> Literal {
        Literal(-self.0)
    }

    /// Raw signed value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether this literal is true under `assignment`. Unassigned variables count as false.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.get(self.var()).map(|v| v == self.is_positive()).unwrap_or(false)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "x{}", self.var())
        } else {
            write!(f, "¬x{}", self.var())
        }
    }
}

/// An ordered, non-empty disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a clause. Empty clauses are rejected.
    pub fn new(literals: Vec<Literal>) -> Result<Self, GroverError> {
        if literals.is_empty() {
            return Err(GroverError::malformed("clause must contain at least one literal"));
        }
        Ok(Self { literals })
    }

    /// Builds a clause from raw signed integers.
    pub fn from_ints(values: &[i64]) -> Result<Self, GroverError> {
        let literals = values.iter().map(|&v| Literal::new(v)).collect::<Result<Vec<_>, _>>()?;
        Self::new(literals)
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` when the clause holds no literals. [`Clause::new`] never returns one.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Highest variable index referenced.
    pub fn max_var(&self) -> usize {
        self.literals.iter().map(Literal::var).max().unwrap_or(0)
    }

    /// Contains both `x` and `¬x` for some variable.
    pub fn is_tautology(&self) -> bool {
        self.literals.iter().any(|l| self.literals.contains(&l.negated()))
    }

    /// At least one literal holds under `assignment`.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|l| l.is_satisfied_by(assignment))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { " ∨ " } else { "" }, lit)?;
        }
        write!(f, ")")
    }
}

/// A conjunction of clauses over variables `1..=num_vars`.
///
/// Immutable once built; every constructor enforces `num_vars >= 1` and that
/// no literal references a variable above `num_vars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
    num_vars: usize,
}

impl Formula {
    /// Creates a formula whose variable count is the highest literal magnitude.
    pub fn new(clauses: Vec<Clause>) -> Result<Self, GroverError> {
        let num_vars = clauses.iter().map(Clause::max_var).max().unwrap_or(0);
        Self::with_num_vars(num_vars, clauses)
    }

    /// Creates a formula with an explicitly declared variable count.
    ///
    /// Declaring more variables than the clauses mention is allowed (the extra
    /// variables are unconstrained); declaring fewer is a `MalformedFormula`.
    pub fn with_num_vars(num_vars: usize, clauses: Vec<Clause>) -> Result<Self, GroverError> {
        if num_vars < 1 {
            return Err(GroverError::degenerate("formula must reference at least one variable"));
        }
        if let Some(clause) = clauses.iter().find(|c| c.max_var() > num_vars) {
            return Err(GroverError::malformed(format!(
                "clause {} references variable {} but only {} variable(s) are declared",
                clause,
                clause.max_var(),
                num_vars
            )));
        }
        Ok(Self { clauses, num_vars })
    }

    /// Convenience constructor from integer literal lists, e.g. `[[1, 2], [-3, -4]]`.
    pub fn from_clauses<I, C>(clauses: I) -> Result<Self, GroverError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i64]>,
    {
        let clauses = clauses
            .into_iter()
            .map(|c| Clause::from_ints(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(clauses)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Every clause holds under `assignment`.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied_by(assignment))
    }

    /// Evaluates the formula on a variable-register bit pattern (variable `v` is bit `v-1`).
    pub fn is_satisfied_by_pattern(&self, pattern: u64) -> bool {
        self.evaluate(&Assignment::from_pattern(pattern, self.num_vars))
    }

    /// Classical brute-force count of satisfying assignments.
    ///
    /// Fails with `ResourceExceeded` once `2^num_vars` no longer fits a `u64`.
    pub fn count_solutions(&self) -> Result<u64, GroverError> {
        let max_vars = u64::BITS as usize - 1;
        if self.num_vars > max_vars {
            return Err(GroverError::ResourceExceeded { required_qubits: self.num_vars, max_qubits: max_vars });
        }
        Ok((0..1u64 << self.num_vars).filter(|&p| self.is_satisfied_by_pattern(p)).count() as u64)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "⊤");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { " ∧ " } else { "" }, clause)?;
        }
        Ok(())
    }
}

/// Bit `i` of `pattern`; `false` for `i >= 64`.
pub(crate) fn pattern_bit(pattern: u64, i: usize) -> bool {
    u32::try_from(i).ok().and_then(|i| pattern.checked_shr(i)).is_some_and(|p| p & 1 == 1)
}

/// A truth value for every variable `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Builds an assignment from explicit values; `values[0]` is variable 1.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Decodes the low `num_vars` bits of a variable-register pattern.
    /// Variables past the 64th read as `false`.
    pub fn from_pattern(pattern: u64, num_vars: usize) -> Self {
        Self { values: (0..num_vars).map(|i| pattern_bit(pattern, i)).collect() }
    }

    /// Inverse of [`Assignment::from_pattern`]. Variables past the 64th are dropped.
    pub fn to_pattern(&self) -> u64 {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .fold(0u64, |acc, (i, _)| acc | u32::try_from(i).ok().and_then(|i| 1u64.checked_shl(i)).unwrap_or(0))
    }

    /// Value of the 1-based variable `var`.
    pub fn get(&self, var: usize) -> Option<bool> {
        var.checked_sub(1).and_then(|i| self.values.get(i).copied())
    }

    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// `(variable index, value)` pairs in ascending variable order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.values.iter().enumerate().map(|(i, &v)| (i + 1, v))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, value)) in self.iter().enumerate() {
            write!(f, "{}x{}={}", if i > 0 { ", " } else { "" }, var, value as u8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rejects_zero() {
        assert!(matches!(Literal::new(0), Err(GroverError::MalformedFormula { .. })));
    }

    #[test]
    fn test_clause_rejects_empty() {
        assert!(matches!(Clause::new(vec![]), Err(GroverError::MalformedFormula { .. })));
        let unit = Clause::from_ints(&[3]).unwrap();
        assert!(!unit.is_empty());
        assert_eq!(unit.len(), 1);
    }

    #[test]
    fn test_num_vars_is_highest_magnitude() -> Result<(), GroverError> {
        let formula = Formula::from_clauses([vec![1, 2], vec![-3, -4], vec![-5, 1]])?;
        assert_eq!(formula.num_vars(), 5);
        assert_eq!(formula.num_clauses(), 3);
        Ok(())
    }

    #[test]
    fn test_declared_vars_below_literals_is_malformed() -> Result<(), GroverError> {
        let clauses = vec![Clause::from_ints(&[1, 4])?];
        assert!(matches!(Formula::with_num_vars(3, clauses), Err(GroverError::MalformedFormula { .. })));
        Ok(())
    }

    #[test]
    fn test_no_variables_is_degenerate() {
        let empty: Vec<Vec<i64>> = vec![];
        assert!(matches!(Formula::from_clauses(empty), Err(GroverError::DegenerateInput { .. })));
    }

    #[test]
    fn test_evaluate_and_count() -> Result<(), GroverError> {
        let formula = Formula::from_clauses([vec![1, 2], vec![-3, -4], vec![-5, 1]])?;
        let a = Assignment::new(vec![true, false, false, false, false]);
        assert!(formula.evaluate(&a));
        let b = Assignment::new(vec![false, false, true, true, true]);
        assert!(!formula.evaluate(&b));
        // x1 true: 3 choices of (x3,x4) times 4 of (x2,x5); x1 false forces x2, ¬x5.
        assert_eq!(formula.count_solutions()?, 15);
        Ok(())
    }

    #[test]
    fn test_pattern_round_trip_bit_order() {
        let a = Assignment::from_pattern(0b00101, 5);
        assert_eq!(a.get(1), Some(true));
        assert_eq!(a.get(2), Some(false));
        assert_eq!(a.get(3), Some(true));
        assert_eq!(a.get(6), None);
        assert_eq!(a.get(0), None);
        assert_eq!(a.to_pattern(), 0b00101);
    }

    #[test]
    fn test_wide_formula_patterns_do_not_overflow() -> Result<(), GroverError> {
        let formula = Formula::from_clauses([vec![70], vec![1]])?;
        assert_eq!(formula.num_vars(), 70);

        let a = Assignment::from_pattern(1, 70);
        assert_eq!(a.get(1), Some(true));
        assert_eq!(a.get(70), Some(false));
        assert_eq!(a.to_pattern(), 1);
        assert!(!formula.is_satisfied_by_pattern(u64::MAX));

        let mut values = vec![false; 70];
        values[69] = true;
        assert_eq!(Assignment::new(values).to_pattern(), 0);

        assert_eq!(
            formula.count_solutions(),
            Err(GroverError::ResourceExceeded { required_qubits: 70, max_qubits: 63 })
        );
        Ok(())
    }

    #[test]
    fn test_tautology_detection() -> Result<(), GroverError> {
        assert!(Clause::from_ints(&[2, -2, 3])?.is_tautology());
        assert!(!Clause::from_ints(&[2, 3])?.is_tautology());
        Ok(())
    }
}
