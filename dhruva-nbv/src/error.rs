//! Error types for DhruvaNBV

use std::time::Duration;

use thiserror::Error;
use vastu_ig::{IgError, MapError};

use crate::view::ViewId;

/// Failure of a robot or world-model channel call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error("Communication failure: {0}")]
    Communication(String),

    #[error("Service unavailable")]
    Unavailable,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Computation failure: {0}")]
    Computation(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Cancelled")]
    Cancelled,
}

impl From<IgError> for ChannelError {
    fn from(e: IgError) -> Self {
        match e {
            IgError::ConfigurationInvalid(msg) => ChannelError::ConfigurationInvalid(msg),
            IgError::Cancelled => ChannelError::Cancelled,
            IgError::Communication(msg) => ChannelError::Communication(msg),
            IgError::Timeout(after) => ChannelError::Timeout(after),
        }
    }
}

/// Rejected view space construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewSpaceError {
    #[error("Duplicate view id {0}")]
    DuplicateId(ViewId),
}

/// Negative or non-finite movement cost.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Invalid movement cost: {0}")]
pub struct InvalidCost(pub f64);

/// DhruvaNBV error type
#[derive(Error, Debug)]
pub enum NbvError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("View space error: {0}")]
    ViewSpace(#[from] ViewSpaceError),

    #[error("Thread error: {0}")]
    Thread(String),
}

impl From<toml::de::Error> for NbvError {
    fn from(e: toml::de::Error) -> Self {
        NbvError::Config(e.to_string())
    }
}

impl From<IgError> for NbvError {
    fn from(e: IgError) -> Self {
        match e {
            IgError::ConfigurationInvalid(msg) => NbvError::Config(msg),
            other => NbvError::Channel(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NbvError>;
