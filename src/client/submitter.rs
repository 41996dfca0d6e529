use reqwest::StatusCode;

use crate::{editor::DayConfigEditor, models::ScheduleHrefResponse};

/// Yes/no prompt shown before anything is sent
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    InProgress,
    Failed(String),
    Completed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The operator answered no; nothing was sent
    Cancelled,
    /// Accepted; navigate to this location
    Redirect(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server rejected the submission: {status} - {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Holds the submitter in [`SubmitState::InProgress`] until finished. If the
/// submission future is dropped first, the state falls back to idle.
struct InProgressGuard<'a>(&'a mut SubmitState);

impl<'a> InProgressGuard<'a> {
    fn begin(state: &'a mut SubmitState) -> Self {
        *state = SubmitState::InProgress;
        Self(state)
    }

    fn finish(self, next: SubmitState) {
        *self.0 = next;
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        if *self.0 == SubmitState::InProgress {
            *self.0 = SubmitState::Idle;
        }
    }
}

/// Sends a month's day configurations to the schedule endpoint.
///
/// One request per submission, no retries. A failed submission leaves the
/// submitter in [`SubmitState::Failed`], from which it can submit again.
pub struct ScheduleSubmitter {
    client: reqwest::Client,
    target_url: String,
    confirm_message: String,
    state: SubmitState,
}

impl ScheduleSubmitter {
    pub fn new(target_url: impl Into<String>, confirm_message: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_url: target_url.into(),
            confirm_message: confirm_message.into(),
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::InProgress
    }

    pub async fn submit<P>(
        &mut self,
        editor: &DayConfigEditor,
        prompt: &P,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        P: ConfirmPrompt + ?Sized,
    {
        if !prompt.confirm(&self.confirm_message) {
            return Ok(SubmitOutcome::Cancelled);
        }

        let in_progress = InProgressGuard::begin(&mut self.state);
        let day_confs = editor.build_submission();
        tracing::debug!(
            year_month = %editor.year_month(),
            days = day_confs.len(),
            url = %self.target_url,
            "Submitting day configurations"
        );

        match send(&self.client, &self.target_url, &day_confs).await {
            Ok(href) => {
                in_progress.finish(SubmitState::Completed(href.clone()));
                Ok(SubmitOutcome::Redirect(href))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Schedule submission failed");
                in_progress.finish(SubmitState::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}

async fn send(
    client: &reqwest::Client,
    target_url: &str,
    day_confs: &[crate::models::DayConfig],
) -> Result<String, SubmitError> {
    let response = client.post(target_url).json(day_confs).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SubmitError::Rejected { status, body });
    }

    let body: ScheduleHrefResponse = response.json().await?;
    Ok(body.schedule_href)
}
