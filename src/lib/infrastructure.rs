//! Adapters connecting the domain ports to real services

pub mod email;
pub mod logging;
pub mod settings;
