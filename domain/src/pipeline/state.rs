//! Cycle state machine
//!
//! One cycle moves strictly forward through
//! `Received → Planned → Retrieved → Drafted → Verified → Completed`.
//! `Failed` is reachable from every non-terminal state and records the
//! stage that was running when the failure happened.

use super::stage::Stage;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// State of one orchestration cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CycleState {
    Received,
    Planned,
    Retrieved,
    Drafted,
    Verified,
    Completed,
    Failed { stage: Stage, reason: String },
}

impl CycleState {
    pub fn name(&self) -> &'static str {
        match self {
            CycleState::Received => "received",
            CycleState::Planned => "planned",
            CycleState::Retrieved => "retrieved",
            CycleState::Drafted => "drafted",
            CycleState::Verified => "verified",
            CycleState::Completed => "completed",
            CycleState::Failed { .. } => "failed",
        }
    }

    /// The only state this one may move to on success.
    pub fn successor(&self) -> Option<CycleState> {
        match self {
            CycleState::Received => Some(CycleState::Planned),
            CycleState::Planned => Some(CycleState::Retrieved),
            CycleState::Retrieved => Some(CycleState::Drafted),
            CycleState::Drafted => Some(CycleState::Verified),
            CycleState::Verified => Some(CycleState::Completed),
            CycleState::Completed | CycleState::Failed { .. } => None,
        }
    }

    /// Stage that runs while the cycle sits in this state.
    ///
    /// `Verified` still reports [`Stage::Verification`]: shaping the result
    /// is the tail of that stage.
    pub fn active_stage(&self) -> Option<Stage> {
        match self {
            CycleState::Received => Some(Stage::Planning),
            CycleState::Planned => Some(Stage::Retrieval),
            CycleState::Retrieved => Some(Stage::Answering),
            CycleState::Drafted | CycleState::Verified => Some(Stage::Verification),
            CycleState::Completed | CycleState::Failed { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleState::Completed | CycleState::Failed { .. })
    }

    /// Validate a move to `next`, which must be this state's successor.
    pub fn advance(&self, next: CycleState) -> Result<CycleState, DomainError> {
        if self.successor().as_ref() == Some(&next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_transition(self, &next))
        }
    }

    /// `Failed` state attributed to the stage running in this state.
    pub fn fail(&self, reason: impl Into<String>) -> Result<CycleState, DomainError> {
        let reason = reason.into();
        match self.active_stage() {
            Some(stage) => Ok(CycleState::Failed { stage, reason }),
            None => Err(DomainError::invalid_transition(
                self,
                &CycleState::Failed {
                    stage: Stage::Verification,
                    reason,
                },
            )),
        }
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleState::Failed { stage, reason } => write!(f, "failed({}, {})", stage, reason),
            other => f.write_str(other.name()),
        }
    }
}

/// Tracks one cycle through the state machine (Entity)
#[derive(Debug, Clone)]
pub struct PipelineRun {
    id: String,
    state: CycleState,
    history: Vec<CycleState>,
}

impl PipelineRun {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: CycleState::Received,
            history: vec![CycleState::Received],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[CycleState] {
        &self.history
    }

    /// Stage currently running, if the cycle is not finished.
    pub fn active_stage(&self) -> Option<Stage> {
        self.state.active_stage()
    }

    /// Move to `next`, which must be the successor of the current state.
    pub fn transition(&mut self, next: CycleState) -> Result<(), DomainError> {
        let next = self.state.advance(next)?;
        self.enter(next);
        Ok(())
    }

    /// Move to the successor state. Returns `None` once terminal.
    pub fn advance(&mut self) -> Option<&CycleState> {
        let next = self.state.successor()?;
        self.enter(next);
        Some(&self.state)
    }

    /// Enter `Failed`, attributing the failure to the running stage.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<Stage, DomainError> {
        let failed = self.state.fail(reason)?;
        let CycleState::Failed { stage, .. } = &failed else {
            return Err(DomainError::invalid_transition(&self.state, &failed));
        };
        let stage = *stage;
        self.enter(failed);
        Ok(stage)
    }

    fn enter(&mut self, state: CycleState) {
        self.history.push(state.clone());
        self.state = state;
    }
}
