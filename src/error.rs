//! Error type for the fallible edges of the gateway: configuration and I/O.
//!
//! Admission and correlation outcomes are result codes ([`crate::AdmissionResult`],
//! [`crate::CorrelationResult`]), not errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid time of day for {key}: {value:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTime { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
