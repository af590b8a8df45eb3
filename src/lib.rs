//! ReddyFit core: profile validation, metabolic targets and daily progress.
//!
//! Raw forms go through [`validation`], targets come from [`metabolic`] and
//! [`goals`], and [`progress`] turns a profile plus one day's log into
//! dashboard metrics. [`client::ReddyFitClient`] wires these to a
//! [`store::ProfileStore`]; [`ai`] is the boundary with hosted models.

pub mod ai;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod firestore;
pub mod firestore_store;
pub mod goals;
pub mod logging;
pub mod metabolic;
pub mod models;
pub mod progress;
pub mod store;
pub mod validation;

pub use client::ReddyFitClient;
pub use error::{Error, FieldViolation, Result, ValidationError};
