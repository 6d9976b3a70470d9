//! Error types for the pendant session.

use core::fmt;

/// Errors that can occur when talking to the pendant.
#[derive(Debug)]
pub enum LinkError<E> {
    /// Underlying I2C bus error.
    I2c(E),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for LinkError<E> {
    fn from(error: E) -> Self {
        LinkError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinkError::I2c(e) => write!(f, "I2C error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for LinkError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LinkError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
        }
    }
}
