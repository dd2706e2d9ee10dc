//! Error types surfaced by the remap dispatcher.

use std::fmt;

use thiserror::Error;

/// Which half of a synthetic key pair was being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Press,
    Release,
}

impl fmt::Display for KeyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPhase::Press => f.write_str("press"),
            KeyPhase::Release => f.write_str("release"),
        }
    }
}

/// Platform-level reason a key injector could not synthesize an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InjectorError {
    reason: String,
}

impl InjectorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Recoverable failure of a single dispatch.
///
/// The host is expected to log it and keep processing input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemapError {
    #[error("failed to inject key {phase} for key code {key_code:#04X}: {source}")]
    Injection {
        key_code: u32,
        phase: KeyPhase,
        #[source]
        source: InjectorError,
    },
}

impl RemapError {
    pub fn key_code(&self) -> u32 {
        match self {
            RemapError::Injection { key_code, .. } => *key_code,
        }
    }

    pub fn phase(&self) -> KeyPhase {
        match self {
            RemapError::Injection { phase, .. } => *phase,
        }
    }
}
