pub mod builtins;
pub mod compose;
pub mod config;
pub mod directory;
pub mod error;
pub mod menu;
pub mod registry;
pub mod selection;
pub mod types;
