//! Funding program recommender: normalizes heterogeneous requirement data, asks the
//! questions that narrow the catalog fastest, and ranks the programs that remain.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod criteria;
pub mod error;
pub mod normalization;
pub mod question;
pub mod scoring;
pub mod telemetry;

#[cfg(test)]
mod tests;
