pub mod app;
pub mod color;
pub mod config;
pub mod controls;
pub mod data;
pub mod error;
pub mod metrics;
pub mod state;
pub mod ui;
pub mod view;
