//! Debug trace types for the grouping engine.
//!
//! A trace records, for each record fed to the engine, which transition it
//! triggered and how deep the open-group stack was afterwards. Useful for
//! seeing why a record ended up where it did in the tree.

use std::fmt;

use crate::group::GroupKind;

/// The transition one record triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A header record opened a container group.
    Open(GroupKind),
    /// A payment record became a `Detail`; `batch` names the batch key when
    /// the record also opened a new batch.
    Detail { batch: Option<String> },
    /// An invoice record was attached to the latest detail.
    Overflow,
    /// A batch trailer closed the open batch.
    CloseBatch,
    /// A lockbox trailer closed the open lockbox, and the open batch first if
    /// there was one.
    CloseLockbox { closed_batch: bool },
    /// A transmission trailer reset the stack and was added at top level.
    TransmissionTrailer,
    /// The record had no valid context and became an `Orphan` group.
    Orphan,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Open(kind) => write!(f, "open {}", kind.label()),
            Action::Detail { batch: Some(key) } => write!(f, "open Batch #{key}, add Detail"),
            Action::Detail { batch: None } => write!(f, "add Detail"),
            Action::Overflow => write!(f, "append overflow"),
            Action::CloseBatch => write!(f, "close Batch"),
            Action::CloseLockbox { closed_batch: true } => write!(f, "close Batch, close Lockbox"),
            Action::CloseLockbox { closed_batch: false } => write!(f, "close Lockbox"),
            Action::TransmissionTrailer => write!(f, "transmission trailer"),
            Action::Orphan => write!(f, "orphan"),
        }
    }
}

/// One step of the grouping automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Sequence index of the record.
    pub index: usize,
    pub code: char,
    pub action: Action,
    /// Open groups on the stack after the step, not counting the root.
    pub depth: usize,
}

/// Complete trace of one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTrace {
    pub transitions: Vec<Transition>,
}

impl GroupTrace {
    /// Transitions that produced an `Orphan`.
    pub fn orphans(&self) -> impl Iterator<Item = &Transition> {
        self.transitions
            .iter()
            .filter(|t| t.action == Action::Orphan)
    }
}

impl fmt::Display for GroupTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.transitions {
            writeln!(
                f,
                "{:>6}  {}  depth={}  {}",
                t.index, t.code, t.depth, t.action
            )?;
        }
        Ok(())
    }
}
