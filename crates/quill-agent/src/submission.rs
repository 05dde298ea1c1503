// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender conversation state.
//!
//! Each pending story is a [`Submission`] whose [`Step`] records which
//! selections have been made. Because a later step can only be represented
//! by carrying the earlier choices, a submission can never skip or reorder
//! a step.

use chrono::{DateTime, Utc};
use quill_core::catalog::{ContentType, Framework, Module};

/// Where a sender currently stands in the capture wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WizardState {
    #[strum(serialize = "no story is pending")]
    Empty,
    #[strum(serialize = "waiting for a framework")]
    AwaitingFramework,
    #[strum(serialize = "waiting for a module")]
    AwaitingModule,
    #[strum(serialize = "waiting for a content type")]
    AwaitingContentType,
}

/// Selections made so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AwaitingFramework,
    AwaitingModule { framework: Framework },
    AwaitingContentType { framework: Framework, module: Module },
}

/// A story that has been received but not yet fully categorized.
#[derive(Debug, Clone)]
pub struct Submission {
    pub originator_id: String,
    pub raw_text: String,
    pub received_at: DateTime<Utc>,
    pub step: Step,
}

impl Submission {
    pub fn new(originator_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            originator_id: originator_id.into(),
            raw_text: raw_text.into(),
            received_at: Utc::now(),
            step: Step::AwaitingFramework,
        }
    }

    pub fn state(&self) -> WizardState {
        match self.step {
            Step::AwaitingFramework => WizardState::AwaitingFramework,
            Step::AwaitingModule { .. } => WizardState::AwaitingModule,
            Step::AwaitingContentType { .. } => WizardState::AwaitingContentType,
        }
    }

    pub fn framework(&self) -> Option<Framework> {
        match self.step {
            Step::AwaitingFramework => None,
            Step::AwaitingModule { framework } | Step::AwaitingContentType { framework, .. } => {
                Some(framework)
            }
        }
    }

    pub fn module(&self) -> Option<Module> {
        match self.step {
            Step::AwaitingContentType { module, .. } => Some(module),
            _ => None,
        }
    }

    /// Consumes a submission that is waiting for its content type.
    ///
    /// Returns the submission unchanged when it is at any other step.
    pub fn complete(self, content_type: ContentType) -> Result<CompletedSubmission, Self> {
        match self.step {
            Step::AwaitingContentType { framework, module } => Ok(CompletedSubmission {
                originator_id: self.originator_id,
                raw_text: self.raw_text,
                received_at: self.received_at,
                framework,
                module,
                content_type,
            }),
            _ => Err(self),
        }
    }
}

/// A submission with all three selections made, ready to be finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSubmission {
    pub originator_id: String,
    pub raw_text: String,
    pub received_at: DateTime<Utc>,
    pub framework: Framework,
    pub module: Module,
    pub content_type: ContentType,
}
