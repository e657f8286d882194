pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod parser;
pub mod web;

pub use error::GridError;
