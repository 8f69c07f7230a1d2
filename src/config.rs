//! Run configuration.
//!
//! A run is described by [`RunConfig`], which can be built from defaults,
//! loaded from a JSON file or pointed to by the `LATTICE_SCATTER_CONFIG`
//! environment variable.  Missing fields fall back to the classic settings.

use crate::error::ScatterError;
use crate::lcg::LcgParams;
use crate::quantize::QuantizationParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "LATTICE_SCATTER_CONFIG";

/// Parameters for one comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Points generated per method.
    pub n_points: usize,
    /// Shared exclusive coordinate bound; also the panel side in pixels.
    pub canvas_size: u64,
    /// Width of each quantized bit group.
    pub bits_per_number: u32,
    /// Recurrence parameters for the classical generator.
    pub lcg: LcgParams,
    /// Extra bits requested from the entropy source beyond the strict need.
    pub overprovision_bits: usize,
    /// Fixed seed for the simulated entropy device; `None` uses OS entropy.
    pub entropy_seed: Option<u64>,
    /// Destination of the rendered comparison.
    pub output_image: String,
    /// Optional directory receiving CSV exports of both point sets.
    pub csv_dir: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_points: 100_000,
            canvas_size: 1000,
            bits_per_number: 16,
            lcg: LcgParams::classic(),
            overprovision_bits: 0,
            entropy_seed: None,
            output_image: "obvious_final_comparison.bmp".to_string(),
            csv_dir: None,
        }
    }
}

impl RunConfig {
    /// Loads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScatterError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| ScatterError::Io(format!("{}: {err}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Decodes a config from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, ScatterError> {
        serde_json::from_str(raw).map_err(|err| ScatterError::Config(err.to_string()))
    }

    /// Loads the file named by `LATTICE_SCATTER_CONFIG`, or the defaults.
    pub fn from_env() -> Result<Self, ScatterError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Number of values each method draws: `2 * n_points`.
    pub fn values_needed(&self) -> Result<usize, ScatterError> {
        self.n_points.checked_mul(2).ok_or_else(|| {
            ScatterError::InvalidParameter(format!("n_points {} too large", self.n_points))
        })
    }

    /// Quantization parameters covering both axes.
    pub fn quantization(&self) -> Result<QuantizationParams, ScatterError> {
        QuantizationParams::new(
            self.bits_per_number,
            self.canvas_size,
            self.values_needed()?,
        )
    }

    /// Checks every parameter before any work starts.
    pub fn validate(&self) -> Result<(), ScatterError> {
        if self.n_points == 0 {
            return Err(ScatterError::InvalidParameter(
                "n_points must be at least 1".to_string(),
            ));
        }
        if self.canvas_size == 0 {
            return Err(ScatterError::InvalidParameter(
                "canvas size must be positive".to_string(),
            ));
        }
        self.lcg.validate()?;
        self.quantization()?.required_bits()?;
        Ok(())
    }
}
