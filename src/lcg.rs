//! Linear congruential coordinate generator.
//!
//! This module exposes the deliberately weak recurrence
//! `state <- (a * state + c) mod m` used as the classical side of the
//! comparison.  A small modulus relative to the canvas makes the lattice
//! structure of consecutive pairs visible once enough points are plotted.
//! All arithmetic is carried out on `u128` so the discretised output is exact
//! and identical on every platform.

use crate::error::ScatterError;
use serde::{Deserialize, Serialize};

/// Parameters of the recurrence `state <- (multiplier * state + increment) mod modulus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcgParams {
    /// Multiplier `a`.
    pub multiplier: u64,
    /// Increment `c`.
    pub increment: u64,
    /// Modulus `m`.
    pub modulus: u64,
    /// Initial state, must lie in `[0, m)`.
    pub seed: u64,
}

impl LcgParams {
    /// The lattice-revealing parameter set: `a = 75`, `c = 74`, `m = 2^16 + 1`, seed `42`.
    pub const fn classic() -> Self {
        Self {
            multiplier: 75,
            increment: 74,
            modulus: (1 << 16) + 1,
            seed: 42,
        }
    }

    /// Checks the parameter invariants without building a generator.
    pub fn validate(&self) -> Result<(), ScatterError> {
        if self.modulus == 0 {
            return Err(ScatterError::InvalidParameter(
                "modulus must be positive".to_string(),
            ));
        }
        if self.seed >= self.modulus {
            return Err(ScatterError::InvalidParameter(format!(
                "seed {} outside [0, {})",
                self.seed, self.modulus
            )));
        }
        Ok(())
    }
}

impl Default for LcgParams {
    fn default() -> Self {
        Self::classic()
    }
}

/// A recurrence generator mapping each new state onto `[0, domain_limit)`.
///
/// Every instance owns its state; two generators built from the same
/// parameters evolve independently and produce identical sequences.
#[derive(Debug, Clone)]
pub struct LinearCongruential {
    params: LcgParams,
    domain_limit: u64,
    state: u64,
}

impl LinearCongruential {
    /// Creates a generator seeded with `params.seed`.
    pub fn new(params: LcgParams, domain_limit: u64) -> Result<Self, ScatterError> {
        params.validate()?;
        if domain_limit == 0 {
            return Err(ScatterError::InvalidParameter(
                "domain limit must be positive".to_string(),
            ));
        }
        Ok(Self {
            params,
            domain_limit,
            state: params.seed,
        })
    }

    /// Returns the parameters the generator was built with.
    pub fn params(&self) -> &LcgParams {
        &self.params
    }

    /// Returns the exclusive upper bound of emitted values.
    pub fn domain_limit(&self) -> u64 {
        self.domain_limit
    }

    /// Returns the current recurrence state.
    pub fn state(&self) -> u64 {
        self.state
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        let m = self.params.modulus as u128;
        let next = (self.params.multiplier as u128 * self.state as u128
            + self.params.increment as u128)
            % m;
        self.state = next as u64;
        self.state
    }

    /// Advances the recurrence once and returns the scaled output.
    ///
    /// The output is `floor(state * domain_limit / m)`, which equals
    /// `floor(state / m * domain_limit)` without any rounding drift.
    pub fn draw(&mut self) -> u64 {
        let state = self.advance();
        ((state as u128 * self.domain_limit as u128) / self.params.modulus as u128) as u64
    }

    /// Issues `count` sequential draws.
    pub fn draws(&mut self, count: usize) -> Vec<u64> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.draw());
        }
        out
    }
}

/// Produces the flat `[x_0..x_{n-1}, y_0..y_{n-1}]` layout for `n` points.
///
/// Consecutive draws form one point (x first, then y), matching the way the
/// classical generator is sampled; the result is laid out in split order so
/// it can be handed straight to [`assemble`](crate::assemble::assemble).
pub fn split_coordinates(
    params: LcgParams,
    domain_limit: u64,
    n: usize,
) -> Result<Vec<u64>, ScatterError> {
    let mut generator = LinearCongruential::new(params, domain_limit)?;
    let total = n.checked_mul(2).ok_or_else(|| {
        ScatterError::InvalidParameter(format!("point count {n} overflows draw count"))
    })?;
    let mut flat = vec![0u64; total];
    for i in 0..n {
        flat[i] = generator.draw();
        flat[n + i] = generator.draw();
    }
    Ok(flat)
}
