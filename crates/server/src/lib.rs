pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod db;
pub mod error_convert;
pub mod health;
pub mod openapi;
pub mod rest;
pub mod telemetry;

// Persistence ports and SQLite adapters
pub mod repo;
