//! Orchestrates one comparison run.
//!
//! The classical path draws from the recurrence; the entropy path quantizes a
//! bitstream that must be fully acquired first.  Once the bits are in hand the
//! two paths share nothing, so they run side by side on the rayon pool.

use crate::assemble::{assemble, CoordinateList};
use crate::config::RunConfig;
use crate::entropy::{provision, EntropySource};
use crate::error::ScatterError;
use crate::lcg::split_coordinates;
use crate::quantize::BitQuantizer;
use std::time::Instant;

/// The two point sets of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Points from the linear congruential generator.
    pub prng: CoordinateList,
    /// Points quantized from the entropy bitstream.
    pub entropy: CoordinateList,
}

/// Generates the recurrence-driven point set.
pub fn generate_prng_points(cfg: &RunConfig) -> Result<CoordinateList, ScatterError> {
    let start = Instant::now();
    let flat = split_coordinates(cfg.lcg, cfg.canvas_size, cfg.n_points)?;
    let list = assemble(&flat, cfg.n_points, cfg.canvas_size)?;
    println!(
        "QSYS|mod=LCG|evt=GENERATED|points={}|a={}|c={}|m={}|seed={}|ms={:.3}",
        list.len(),
        cfg.lcg.multiplier,
        cfg.lcg.increment,
        cfg.lcg.modulus,
        cfg.lcg.seed,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(list)
}

/// Quantizes an already acquired bitstream into a point set.
pub fn generate_entropy_points(
    cfg: &RunConfig,
    bits: Vec<bool>,
) -> Result<CoordinateList, ScatterError> {
    let start = Instant::now();
    let params = cfg.quantization()?;
    let available = bits.len();
    let values = BitQuantizer::new(params).quantize_all(bits)?;
    let list = assemble(&values, cfg.n_points, cfg.canvas_size)?;
    println!(
        "QSYS|mod=QUANT|evt=GENERATED|points={}|bits_per_number={}|bits_available={}|bits_used={}|ms={:.3}",
        list.len(),
        params.bits_per_number(),
        available,
        params.required_bits()?,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(list)
}

/// Runs both methods for `cfg`, drawing entropy from `source`.
///
/// Fails without producing either point set if any stage fails.
pub fn run_comparison<S>(cfg: &RunConfig, source: &mut S) -> Result<Comparison, ScatterError>
where
    S: EntropySource + ?Sized,
{
    cfg.validate()?;
    let needed = cfg.quantization()?.required_bits()?;
    let bits = provision(source, needed, cfg.overprovision_bits)?;
    #[cfg(not(target_arch = "wasm32"))]
    let (prng, entropy) = rayon::join(
        || generate_prng_points(cfg),
        move || generate_entropy_points(cfg, bits),
    );
    #[cfg(target_arch = "wasm32")]
    let (prng, entropy) = (
        generate_prng_points(cfg),
        generate_entropy_points(cfg, bits),
    );
    let comparison = Comparison {
        prng: prng?,
        entropy: entropy?,
    };
    println!(
        "QSYS|mod=COMPARE|evt=DONE|points={}|canvas={}|prng_fp={}|entropy_fp={}",
        cfg.n_points,
        cfg.canvas_size,
        &comparison.prng.fingerprint()[..16],
        &comparison.entropy.fingerprint()[..16]
    );
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{FixedBits, HadamardSimulator};

    fn small_config() -> RunConfig {
        RunConfig {
            n_points: 50,
            canvas_size: 100,
            bits_per_number: 8,
            entropy_seed: Some(3),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_produces_equal_length_sets() {
        let cfg = small_config();
        let mut source = HadamardSimulator::with_seed(3);
        let cmp = run_comparison(&cfg, &mut source).unwrap();
        assert_eq!(cmp.prng.len(), 50);
        assert_eq!(cmp.entropy.len(), 50);
        assert!(cmp
            .prng
            .iter()
            .chain(cmp.entropy.iter())
            .all(|p| p.x < 100 && p.y < 100));
    }

    #[test]
    fn test_prng_first_point_matches_trace() {
        let cfg = RunConfig {
            n_points: 1,
            canvas_size: 1000,
            ..RunConfig::default()
        };
        let list = generate_prng_points(&cfg).unwrap();
        assert_eq!(list.points()[0].x, 49);
        let y_state = (75 * 3224 + 74) % 65537;
        assert_eq!(list.points()[0].y, y_state * 1000 / 65537);
    }

    #[test]
    fn test_short_bitstream_fails_whole_run() {
        let cfg = small_config();
        let mut source = FixedBits::new(vec![true; 8 * 99]);
        assert_eq!(
            run_comparison(&cfg, &mut source),
            Err(ScatterError::InsufficientEntropy {
                needed: 100,
                produced: 99
            })
        );
    }

    #[test]
    fn test_overprovisioned_bits_are_ignored() {
        let cfg = RunConfig {
            n_points: 1,
            canvas_size: 16,
            bits_per_number: 4,
            overprovision_bits: 3,
            ..RunConfig::default()
        };
        let mut source = FixedBits::new(vec![
            true, false, true, true, false, false, false, true, true, true, true,
        ]);
        let cmp = run_comparison(&cfg, &mut source).unwrap();
        assert_eq!(cmp.entropy.points()[0].x, 11);
        assert_eq!(cmp.entropy.points()[0].y, 1);
    }
}
