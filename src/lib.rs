pub mod calendar;
pub mod commands;
pub mod config;
pub mod data_provider;
pub mod domain;
pub mod fixtures;
pub mod tui;
