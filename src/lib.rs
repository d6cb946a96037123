pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod package;
pub mod sequence;
pub mod store;
pub mod transform;
