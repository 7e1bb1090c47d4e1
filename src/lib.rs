pub mod bridge;
pub mod config;
pub mod logfile;
pub mod presets;
pub mod settings;
pub mod ui;
