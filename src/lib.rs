//! Fraud Risk Simulator Library
//!
//! Scores simulated financial transactions for fraud risk and turns the score
//! into display values: a gauge, per-factor bars and a decision panel. Scores
//! come from a fixed heuristic or, optionally, from an external prediction API
//! with a fallback to the heuristic.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Scoring, presentation and analysis pipeline.
//! - `integrations`: External prediction service.
//! - `analysis`: Validation, scoring strategy and rendering pipeline.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Transaction, score and wire models.
//! - `prediction_client`: Prediction API client.
//! - `presentation`: Score to view-model mapping.
//! - `remote_scorer`: Remote scoring with local fallback.
//! - `render`: Output sinks.
//! - `scenarios`: Preset transactions.
//! - `scoring`: Heuristic scoring function.

pub mod api;
pub mod core;
pub mod integrations;

pub mod analysis;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prediction_client;
pub mod presentation;
pub mod remote_scorer;
pub mod render;
pub mod scenarios;
pub mod scoring;
