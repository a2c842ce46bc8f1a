pub mod analyzer;
pub mod apar;
pub mod cli;
pub mod config;
pub mod exit;
pub mod hosts;
pub mod index;
pub mod render;
pub mod table;
pub mod ui;
