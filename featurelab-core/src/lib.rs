//! FeatureLab Core: OHLCV retrieval and technical feature generation.
//!
//! This crate turns a daily price history for one symbol into a flat feature
//! table for downstream models:
//! - Domain types (bars, OHLCV tables)
//! - Market-data providers (Yahoo Finance, CSV files, synthetic random walk)
//! - Indicator library (trend, momentum, volatility, volume)
//! - Indicator and derived-feature stages, assembled into a typed `FeatureTable`
//! - Export to CSV, Parquet and JSON, plus content fingerprinting

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;
