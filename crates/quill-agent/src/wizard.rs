// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The three-step selection wizard.
//!
//! ```text
//! Empty -> AwaitingFramework -> AwaitingModule -> AwaitingContentType -> (finalize) -> Empty
//! ```
//!
//! Every step checks the sender's current state first and then the choice
//! code. A rejected call leaves the pending submission exactly as it was.

use std::collections::HashMap;

use quill_core::QuillError;
use quill_core::catalog::{CatalogItem, ContentType, Framework, Module};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::submission::{Step, Submission, WizardState};
use crate::submitter::{FinalizeOutcome, RecordSubmitter};

pub struct Wizard {
    pending: HashMap<String, Submission>,
    submitter: RecordSubmitter,
}

impl Wizard {
    pub fn new(submitter: RecordSubmitter) -> Self {
        Self {
            pending: HashMap::new(),
            submitter,
        }
    }

    pub fn submitter(&self) -> &RecordSubmitter {
        &self.submitter
    }

    /// Starts a new story, replacing any unfinished one from the same sender.
    pub fn begin(&mut self, originator_id: &str, text: &str) -> Result<Vec<Framework>, QuillError> {
        if text.trim().is_empty() {
            return Err(QuillError::EmptyStory);
        }

        let submission = Submission::new(originator_id, text);
        if let Some(previous) = self.pending.insert(originator_id.to_string(), submission) {
            debug!(
                sender_id = originator_id,
                previous_state = %previous.state(),
                "replacing unfinished story"
            );
        }
        Ok(Framework::iter().collect())
    }

    /// Records the framework and returns the modules it offers.
    pub fn choose_framework(
        &mut self,
        originator_id: &str,
        code: &str,
    ) -> Result<&'static [Module], QuillError> {
        let submission = self.expect_state(
            originator_id,
            WizardState::AwaitingFramework,
            "choose a framework",
        )?;
        let framework = parse_choice::<Framework>(code)?;

        submission.step = Step::AwaitingModule { framework };
        Ok(framework.modules())
    }

    /// Records the module and returns the content types.
    ///
    /// The module must belong to the chosen framework's set.
    pub fn choose_module(
        &mut self,
        originator_id: &str,
        code: &str,
    ) -> Result<Vec<ContentType>, QuillError> {
        let submission = self.expect_state(
            originator_id,
            WizardState::AwaitingModule,
            "choose a module",
        )?;
        let Step::AwaitingModule { framework } = submission.step else {
            return Err(QuillError::Internal("state and step disagree".into()));
        };
        let module = parse_choice::<Module>(code)?;
        if !framework.modules().contains(&module) {
            return Err(QuillError::InvalidChoice {
                step: Module::STEP.to_string(),
                code: code.to_string(),
            });
        }

        submission.step = Step::AwaitingContentType { framework, module };
        Ok(ContentType::all())
    }

    /// Records the content type and finalizes the story.
    ///
    /// Once the choice is accepted the submission is removed, whatever the
    /// outcome of the store write.
    pub async fn choose_content_type(
        &mut self,
        originator_id: &str,
        code: &str,
    ) -> Result<FinalizeOutcome, QuillError> {
        self.expect_state(
            originator_id,
            WizardState::AwaitingContentType,
            "choose a content type",
        )?;
        let content_type = parse_choice::<ContentType>(code)?;

        let submission = self
            .pending
            .remove(originator_id)
            .ok_or_else(|| QuillError::Internal("pending submission vanished".into()))?;
        let completed = submission
            .complete(content_type)
            .map_err(|s| QuillError::Internal(format!("submission not ready: {}", s.state())))?;

        Ok(self.submitter.finalize(completed).await)
    }

    /// Discards the sender's pending story. Returns whether one existed.
    pub fn cancel(&mut self, originator_id: &str) -> bool {
        self.pending.remove(originator_id).is_some()
    }

    pub fn state(&self, originator_id: &str) -> WizardState {
        self.pending
            .get(originator_id)
            .map_or(WizardState::Empty, Submission::state)
    }

    pub fn pending(&self, originator_id: &str) -> Option<&Submission> {
        self.pending.get(originator_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn expect_state(
        &mut self,
        originator_id: &str,
        expected: WizardState,
        operation: &str,
    ) -> Result<&mut Submission, QuillError> {
        let found = self.state(originator_id);
        if found != expected {
            return Err(QuillError::InvalidState {
                operation: operation.to_string(),
                state: found.to_string(),
            });
        }
        self.pending
            .get_mut(originator_id)
            .ok_or_else(|| QuillError::Internal("pending submission vanished".into()))
    }
}

fn parse_choice<T: CatalogItem>(code: &str) -> Result<T, QuillError> {
    T::from_code(code).ok_or_else(|| QuillError::InvalidChoice {
        step: T::STEP.to_string(),
        code: code.to_string(),
    })
}
