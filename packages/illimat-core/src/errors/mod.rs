//! Error types for the engine.

pub mod domain;

pub use domain::{DomainError, InvariantKind, StructuralKind, UnsupportedKind, ValidationKind};
