//! Infrastructure layer - Transport adapters behind the domain ports

pub mod bridge;
