//! Multi-step form progression

use super::form_state::FormFields;
use crate::state::submission::{SubmissionOutcome, SubmissionPipeline, SubmissionRequest};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// One step of a multi-step form.
///
/// Implemented by an enum with one variant per step; `ALL` lists the
/// variants in presentation order and must not be empty.
pub trait StepGroup: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn title(self) -> &'static str;

    /// Ids of the fields presented together on this step
    fn field_ids(self) -> &'static [&'static str];
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("submit is only available on the last step (at step {current} of {count})")]
    NotAtLastStep { current: usize, count: usize },
    #[error("{0} has invalid fields")]
    InvalidGroup(&'static str),
}

/// Tracks which step of a form is active.
///
/// The index always stays within `0..S::ALL.len()` and only moves forward
/// when every field of the current step validates.
pub struct StepController<S: StepGroup> {
    current: usize,
    _groups: PhantomData<S>,
}

impl<S: StepGroup> fmt::Debug for StepController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepController")
            .field("current", &self.current_group())
            .finish()
    }
}

impl<S: StepGroup> Clone for StepController<S> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
            _groups: PhantomData,
        }
    }
}

impl<S: StepGroup> Default for StepController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StepGroup> StepController<S> {
    pub fn new() -> Self {
        Self {
            current: 0,
            _groups: PhantomData,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn current_group(&self) -> S {
        S::ALL[self.current]
    }

    pub fn step_count(&self) -> usize {
        S::ALL.len()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == S::ALL.len()
    }

    /// Fraction of the form reached, counting the current step
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / S::ALL.len() as f64
    }

    /// Move to the next step if the current step validates.
    ///
    /// On failure the step's validation messages are revealed and the
    /// index is left unchanged. Returns whether the current group was valid.
    pub fn advance(&mut self, form: &mut FormFields) -> bool {
        let group = self.current_group();
        if !form.all_valid(group.field_ids()) {
            form.reveal(group.field_ids());
            tracing::debug!("Step {:?} blocked by invalid fields", group);
            return false;
        }
        if !self.is_last() {
            self.current += 1;
        }
        true
    }

    /// Move to the previous step without validating
    pub fn retreat(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Submit the accumulated values from the last step.
    ///
    /// A successful submission clears the form, so the controller returns
    /// to the first step.
    pub async fn submit(
        &mut self,
        form: &mut FormFields,
        pipeline: &SubmissionPipeline,
        request: &SubmissionRequest,
    ) -> Result<SubmissionOutcome, StepError> {
        if !self.is_last() {
            return Err(StepError::NotAtLastStep {
                current: self.current + 1,
                count: S::ALL.len(),
            });
        }
        let group = self.current_group();
        if !form.all_valid(group.field_ids()) {
            form.reveal(group.field_ids());
            return Err(StepError::InvalidGroup(group.title()));
        }

        let outcome = pipeline.submit(form, request).await;
        if outcome.is_success() {
            self.current = 0;
        }
        Ok(outcome)
    }
}
