//! Application layer: the article screen controller and the configuration
//! actor that wires the rest of the services together.

pub mod article;
pub mod config;
