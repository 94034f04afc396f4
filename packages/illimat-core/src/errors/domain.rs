//! Domain-level error type used across the engine.
//!
//! This error type is presentation-agnostic. Drivers embedding the engine
//! must treat `Structural`, `Invariant`, and `Unsupported` errors as fatal
//! to the current game instance; only `Validation` errors describe a
//! rejected request against a still-consistent state.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Structural corruption kinds: the state no longer matches what the rules
/// guarantee (a card that must exist is missing, a pile handle dangles).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructuralKind {
    CardNotFound,
    CardNotInHand,
    PileNotFound,
    OkusNotHeld,
    LuminarySlotMismatch,
    Other(String),
}

/// Violations of the perform/unwind protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantKind {
    /// Unwind requested when the completed stack has nothing to pop.
    UnwindOutOfOrder,
    /// Unwind requested for an action that was never performed.
    NeverPerformed,
    /// Perform requested for an action that already ran.
    AlreadyPerformed,
    /// A player or field index escaped its documented range.
    IndexOutOfRange,
    Other(String),
}

/// Rule-level rejections of a well-formed request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    SeasonRestriction,
    OutOfTurn,
    ValueMismatch,
    NoSuchCombination,
    EmptyTargets,
    SameTurnStockpile,
    HarvestLimitExceeded,
    NoMatchingHandCard,
    InvalidExchange,
    InvalidPlayerCount,
    Other(String),
}

/// Action kinds whose perform/unwind semantics are not defined.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedKind {
    UndefinedPerform,
    UndefinedUnwind,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Deck/hand/pile state corruption; fatal
    Structural(StructuralKind, String),
    /// Perform/unwind protocol violation; fatal
    Invariant(InvariantKind, String),
    /// Action kind with no defined semantics; fatal
    Unsupported(UnsupportedKind, String),
    /// Input or business-rule violation; the state is untouched
    Validation(ValidationKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Structural(kind, d) => write!(f, "structural {kind:?}: {d}"),
            DomainError::Invariant(kind, d) => write!(f, "invariant {kind:?}: {d}"),
            DomainError::Unsupported(kind, d) => write!(f, "unsupported {kind:?}: {d}"),
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn structural(kind: StructuralKind, detail: impl Into<String>) -> Self {
        Self::Structural(kind, detail.into())
    }
    pub fn invariant(kind: InvariantKind, detail: impl Into<String>) -> Self {
        Self::Invariant(kind, detail.into())
    }
    pub fn unsupported(kind: UnsupportedKind, detail: impl Into<String>) -> Self {
        Self::Unsupported(kind, detail.into())
    }
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other(detail.into()), String::new())
    }

    /// Whether the driver may keep using the game instance after seeing
    /// this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DomainError::Validation(_, _))
    }
}
