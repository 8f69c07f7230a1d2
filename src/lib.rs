#![deny(missing_docs)]

//! # lattice_scatter
//!
//! **lattice_scatter** contrasts two ways of filling a square canvas with
//! points.  The classical way draws coordinates from a small linear
//! congruential generator, whose consecutive outputs fall on a visible
//! lattice.  The other way quantizes a true-random bitstream, here produced by
//! a simulated Hadamard-and-measure device, into coordinates of controllable
//! precision.
//!
//! ## Modules
//!
//! * [`lcg`]: the recurrence `state <- (a * state + c) mod m`, scaled exactly
//!   onto `[0, domain_limit)`.
//! * [`quantize`]: MSB-first packing of fixed-width bit groups into bounded
//!   integers, with shortfall detection.
//! * [`assemble`]: splits a flat `2n` sequence into `n` points, x-half then
//!   y-half.
//! * [`entropy`]: bit producers the quantizer consumes.
//! * [`render`]: monochrome scatter panels written as BMP, plus CSV export.
//! * [`config`] and [`compare`]: run settings and the orchestration of a full
//!   comparison.
//!
//! ## Usage
//!
//! ```rust
//! use lattice_scatter::{assemble, BitQuantizer, LcgParams, LinearCongruential, QuantizationParams};
//!
//! let mut lcg = LinearCongruential::new(LcgParams::classic(), 1000).unwrap();
//! assert_eq!(lcg.draw(), 49);
//!
//! let params = QuantizationParams::new(4, 16, 1).unwrap();
//! let values = BitQuantizer::new(params).quantize_text("1011").unwrap();
//! assert_eq!(values, vec![11]);
//!
//! let points = assemble(&[1, 2, 3, 4, 5, 6], 3, 10).unwrap();
//! assert_eq!(points.xs(), vec![1, 2, 3]);
//! ```

pub mod assemble;
pub mod compare;
pub mod config;
pub mod entropy;
mod error;
pub mod lcg;
pub mod quantize;
pub mod render;

pub use assemble::{assemble, CoordinateList, Point};
pub use compare::{generate_entropy_points, generate_prng_points, run_comparison, Comparison};
pub use config::RunConfig;
pub use entropy::{provision, BitFileSource, EntropySource, FixedBits, HadamardSimulator};
pub use error::ScatterError;
pub use lcg::{split_coordinates, LcgParams, LinearCongruential};
pub use quantize::{parse_bit_prefix, parse_bits, BitQuantizer, QuantizationParams};
pub use render::{
    comparison_dimensions, render_comparison, write_coordinates_csv, ScatterCanvas,
};
