//! Email provider adapters

pub mod mandrill;
