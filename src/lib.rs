pub mod engine;
pub mod ingestion;
pub mod services;
pub mod structures;
pub mod web;
