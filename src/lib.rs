pub mod catalog;
pub mod config;
pub mod error;
pub mod impute;
pub mod ingest;
pub mod opponent;
pub mod outlier;
pub mod predict;
pub mod probability;
pub mod quality;
pub mod record;
pub mod sample_data;
pub mod store;
