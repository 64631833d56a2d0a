//! HTTP Route Handlers

pub mod health;
pub mod reports;
