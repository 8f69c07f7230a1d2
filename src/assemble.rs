//! Coordinate pair assembly.
//!
//! Both generation paths emit a flat sequence of `2n` values.  The first half
//! holds the x-coordinates and the second half the y-coordinates; points are
//! paired by index, `point[i] = (flat[i], flat[n + i])`.

use crate::error::ScatterError;
use blake2::digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};

type Blake2b256 = blake2::Blake2b<U32>;

const FINGERPRINT_DOMAIN: &[u8] = b"LATTICE_SCATTER_POINTS";

/// A single bounded coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: u64,
    /// Vertical coordinate.
    pub y: u64,
}

/// Ordered, immutable list of points sharing one domain limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateList {
    domain_limit: u64,
    points: Vec<Point>,
}

impl CoordinateList {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the list holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Exclusive upper bound of every coordinate.
    pub fn domain_limit(&self) -> u64 {
        self.domain_limit
    }

    /// Borrowed view of the points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Collects the x-coordinates.
    pub fn xs(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Collects the y-coordinates.
    pub fn ys(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Domain-separated BLAKE2b-256 digest of the list, hex encoded.
    ///
    /// Two runs with identical parameters yield the same fingerprint, which
    /// makes reproducibility checks cheap to report.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(FINGERPRINT_DOMAIN);
        hasher.update(self.domain_limit.to_be_bytes());
        hasher.update((self.points.len() as u64).to_be_bytes());
        for point in &self.points {
            hasher.update(point.x.to_be_bytes());
            hasher.update(point.y.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Splits `flat` at its midpoint into `n` points bounded by `domain_limit`.
pub fn assemble(flat: &[u64], n: usize, domain_limit: u64) -> Result<CoordinateList, ScatterError> {
    let expected = n.checked_mul(2).ok_or_else(|| {
        ScatterError::InvalidInput(format!("point count {n} overflows sequence length"))
    })?;
    if flat.len() != expected {
        return Err(ScatterError::InvalidInput(format!(
            "expected {expected} values for {n} points, got {}",
            flat.len()
        )));
    }
    if let Some((idx, value)) = flat.iter().enumerate().find(|&(_, &v)| v >= domain_limit) {
        return Err(ScatterError::InvalidInput(format!(
            "value {value} at index {idx} outside [0, {domain_limit})"
        )));
    }
    let (xs, ys) = flat.split_at(n);
    let points = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| Point { x, y })
        .collect();
    Ok(CoordinateList {
        domain_limit,
        points,
    })
}
