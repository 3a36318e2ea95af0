//! Storefront Analytics
//!
//! Client-side logic of the storefront, served over HTTP.
//!
//! ## Features
//! - Reseller sales dashboard aggregated from backend orders
//! - Daily, weekly and monthly sales series for charting
//! - Product variant selection and cart line validation
//! - Order snapshot client for the order backend

pub mod analytics;
pub mod api;
pub mod client;
pub mod config;
pub mod domain;

use thiserror::Error;
use crate::domain::value_objects::EmailError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("No token found. Please log in.")]
    MissingToken,

    #[error("Session rejected by the order service. Please log in again.")]
    Unauthorized,

    #[error("Order service responded with status {status}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid reseller email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Unknown bucket mode: {0}")]
    InvalidBucketMode(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorefrontError {
    /// Failures of the order fetch itself, as opposed to bad input.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
