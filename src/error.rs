//! Error types shared by the generators, the quantizer and the assembler.

use thiserror::Error;

/// Errors produced while building or running a coordinate generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScatterError {
    #[error("invalid parameter: {0}")]
    /// Malformed generator or quantization configuration.
    InvalidParameter(String),
    #[error("insufficient entropy: needed {needed} values, bitstream yielded {produced}")]
    /// The bitstream ran out before enough values were quantized.
    InsufficientEntropy {
        /// Number of values requested.
        needed: usize,
        /// Number of complete values the bitstream could supply.
        produced: usize,
    },
    #[error("invalid input: {0}")]
    /// Input sequence does not have the expected shape.
    InvalidInput(String),
    #[error("io error: {0}")]
    /// Underlying filesystem failure in a collaborator.
    Io(String),
    #[error("config error: {0}")]
    /// Configuration file could not be decoded.
    Config(String),
}

impl From<std::io::Error> for ScatterError {
    fn from(err: std::io::Error) -> Self {
        ScatterError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ScatterError;

    #[test]
    fn test_display_insufficient_entropy() {
        let err = ScatterError::InsufficientEntropy {
            needed: 3,
            produced: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient entropy: needed 3 values, bitstream yielded 2"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ScatterError = io.into();
        assert_eq!(err, ScatterError::Io("missing".to_string()));
    }
}
