//! Entropy sources feeding the bitstream quantizer.
//!
//! The quantizer only needs an ordered, finite run of bits.  Sources implement
//! [`EntropySource`]; the crate ships a simulated Hadamard measurement device,
//! a reader for recorded shot files and a fixed in-memory source.

use crate::error::ScatterError;
use crate::quantize::parse_bit_prefix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

/// Producer of raw binary entropy.
pub trait EntropySource {
    /// Short label for log lines.
    fn name(&self) -> &'static str;

    /// Returns up to `count` bits in shot order.
    ///
    /// Returning fewer than `count` bits is allowed; the quantizer reports the
    /// shortfall.
    fn bits(&mut self, count: usize) -> Result<Vec<bool>, ScatterError>;
}

/// Simulated single-qubit device: a Hadamard gate followed by measurement.
///
/// Every shot collapses to `0` or `1` with probability one half.
#[derive(Debug, Clone)]
pub struct HadamardSimulator {
    rng: StdRng,
}

impl HadamardSimulator {
    /// Seeds the simulator from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the simulator deterministically.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Runs a single shot.
    pub fn measure(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

impl EntropySource for HadamardSimulator {
    fn name(&self) -> &'static str {
        "hadamard-sim"
    }

    fn bits(&mut self, count: usize) -> Result<Vec<bool>, ScatterError> {
        Ok((0..count).map(|_| self.measure()).collect())
    }
}

/// Reads recorded shots, one `0`/`1` character per shot, from a text file.
#[derive(Debug, Clone)]
pub struct BitFileSource {
    path: PathBuf,
}

impl BitFileSource {
    /// Creates a source backed by `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl EntropySource for BitFileSource {
    fn name(&self) -> &'static str {
        "bit-file"
    }

    fn bits(&mut self, count: usize) -> Result<Vec<bool>, ScatterError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|err| ScatterError::Io(format!("{}: {err}", self.path.display())))?;
        parse_bit_prefix(&text, count)
    }
}

/// In-memory source handing out a fixed bit vector once.
#[derive(Debug, Clone, Default)]
pub struct FixedBits {
    bits: Vec<bool>,
}

impl FixedBits {
    /// Wraps an existing bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl EntropySource for FixedBits {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn bits(&mut self, count: usize) -> Result<Vec<bool>, ScatterError> {
        let take = count.min(self.bits.len());
        Ok(self.bits.drain(..take).collect())
    }
}

/// Requests `needed + overprovision` bits from `source`.
///
/// The whole bitstream is acquired before quantization starts.
pub fn provision<S>(
    source: &mut S,
    needed: usize,
    overprovision: usize,
) -> Result<Vec<bool>, ScatterError>
where
    S: EntropySource + ?Sized,
{
    let requested = needed.checked_add(overprovision).ok_or_else(|| {
        ScatterError::InvalidParameter("requested bit count overflows".to_string())
    })?;
    let bits = source.bits(requested)?;
    println!(
        "QSYS|mod=ENTROPY|evt=ACQUIRED|source={}|requested={}|received={}",
        source.name(),
        requested,
        bits.len()
    );
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_seeded_simulator_is_reproducible() {
        let a = HadamardSimulator::with_seed(7).bits(256).unwrap();
        let b = HadamardSimulator::with_seed(7).bits(256).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
    }

    #[test]
    fn test_simulator_is_roughly_balanced() {
        let bits = HadamardSimulator::with_seed(11).bits(10_000).unwrap();
        let ones = bits.iter().filter(|&&b| b).count();
        assert!((4_000..6_000).contains(&ones));
    }

    #[test]
    fn test_fixed_bits_consumed_once() {
        let mut source = FixedBits::new(vec![true, false, true]);
        assert_eq!(source.bits(2).unwrap(), vec![true, false]);
        assert_eq!(source.bits(5).unwrap(), vec![true]);
        assert!(source.bits(1).unwrap().is_empty());
    }

    #[test]
    fn test_provision_adds_margin() {
        let mut source = HadamardSimulator::with_seed(1);
        let bits = provision(&mut source, 32, 8).unwrap();
        assert_eq!(bits.len(), 40);
    }

    #[test]
    fn test_bit_file_source() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("lattice_scatter_bits_{unique}.txt"));
        fs::write(&path, "1011\n0001\n11").unwrap();
        let mut source = BitFileSource::new(&path);
        let bits = source.bits(6).unwrap();
        assert_eq!(bits, vec![true, false, true, true, false, false]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bit_file_trailing_content_ignored() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("lattice_scatter_tail_{unique}.txt"));
        fs::write(&path, "1011\n# end of shots\n").unwrap();
        let mut source = BitFileSource::new(&path);
        assert_eq!(source.bits(4).unwrap(), vec![true, false, true, true]);
        assert!(matches!(source.bits(5), Err(ScatterError::InvalidInput(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bit_file_missing() {
        let mut source = BitFileSource::new("/nonexistent/lattice_scatter_bits.txt");
        assert!(matches!(source.bits(1), Err(ScatterError::Io(_))));
    }
}
