//! Survey use-case service.
//!
//! # Responsibility
//! - Own the single app state record (list, draft, status).
//! - Run every form/store transition and the persistence that follows it.
//! - Turn persistence and export failures into status, never into panics.
//!
//! # Invariants
//! - The full list is written after every add/update/delete.
//! - A save clears the edit target before writing; the draft is cleared and
//!   the notice returned only when the write succeeds.
//! - A delete happens only after the prompt answers `Confirm`.
//! - Survey free text is never written to the log.

use crate::clock::Clock;
use crate::export::csv::{CsvExporter, ShareTarget};
use crate::model::draft::SurveyDraft;
use crate::model::survey::SurveyRecord;
use crate::repo::survey_repo::SurveyRepository;
use crate::service::prompt::{Confirmation, DeletePrompt, Notice};
use crate::service::status::{PersistenceOp, PersistenceStatus};
use crate::service::survey_store::{StoreResult, SurveyStore, SurveyTarget};
use log::{error, info, warn};
use std::path::PathBuf;

/// Everything the single screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub store: SurveyStore,
    pub draft: SurveyDraft,
    pub status: PersistenceStatus,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The prompt was cancelled; nothing changed.
    Cancelled,
    /// The record was removed. `notice` is `None` when the write failed.
    Deleted { notice: Option<Notice> },
}

/// Survey service facade over a repository and a clock.
pub struct SurveyService<R: SurveyRepository, C: Clock> {
    repo: R,
    clock: C,
    state: AppState,
}

impl<R: SurveyRepository, C: Clock> SurveyService<R, C> {
    /// Creates a service with an empty list and a blank draft.
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn surveys(&self) -> &[SurveyRecord] {
        self.state.store.records()
    }

    pub fn draft(&self) -> &SurveyDraft {
        &self.state.draft
    }

    /// Keystroke and tally updates go straight to the draft.
    pub fn draft_mut(&mut self) -> &mut SurveyDraft {
        &mut self.state.draft
    }

    pub fn status(&self) -> &PersistenceStatus {
        &self.state.status
    }

    /// Current on-screen clock value.
    pub fn clock_display(&self) -> String {
        self.clock.now_display()
    }

    /// Restores the persisted list, replacing the in-memory list wholesale.
    ///
    /// Returns the number of records now in memory. Read and decode failures
    /// are logged and recorded in status; the list is left as it was.
    pub fn load_all(&mut self) -> usize {
        match self.repo.load_surveys() {
            Ok(Some(records)) => {
                self.state.store.reset(records);
                self.state.status.record_success(PersistenceOp::Load);
                info!(
                    "event=surveys_load module=service status=ok count={}",
                    self.state.store.len()
                );
            }
            Ok(None) => {
                self.state.status.record_success(PersistenceOp::Load);
                info!("event=surveys_load module=service status=ok count=0 stored=false");
            }
            Err(err) => {
                error!(
                    "event=surveys_load module=service status=error error_code=load_failed error={}",
                    err
                );
                self.state
                    .status
                    .record_failure(PersistenceOp::Load, err.to_string());
            }
        }
        self.state.store.len()
    }

    /// Copies the targeted record into the draft and enters edit mode.
    pub fn enter_edit_mode(&mut self, target: impl Into<SurveyTarget>) -> StoreResult<()> {
        let index = self.state.store.resolve(target.into())?;
        if let Some(record) = self.state.store.get(index) {
            self.state.draft.enter_edit_mode(record);
        }
        Ok(())
    }

    /// Discards the draft and returns to create mode.
    pub fn clear_draft(&mut self) {
        self.state.draft.clear();
    }

    /// Saves the draft: appends in create mode, replaces in edit mode.
    ///
    /// The record is stamped with the clock value at save time.
    pub fn save_draft(&mut self) -> StoreResult<Option<Notice>> {
        let record = self.state.draft.to_record(self.clock.now_display());
        match self.state.draft.editing() {
            Some(id) => self.update(SurveyTarget::Id(id), record),
            None => Ok(self.add(record)),
        }
    }

    /// Appends a record and persists the full list.
    pub fn add(&mut self, record: SurveyRecord) -> Option<Notice> {
        self.state.store.push(record);
        self.state.draft.clear_edit_target();
        let notice = self.finish_save("create");
        if notice.is_some() {
            self.state.draft.clear();
        }
        notice
    }

    /// Replaces the targeted record in place and persists the full list.
    pub fn update(
        &mut self,
        target: impl Into<SurveyTarget>,
        record: SurveyRecord,
    ) -> StoreResult<Option<Notice>> {
        let target = target.into();
        if let Err(err) = self.state.store.replace(target, record) {
            warn!("event=survey_save module=service status=error mode=update error_code=stale_target");
            return Err(err);
        }
        self.state.draft.clear_edit_target();
        let notice = self.finish_save("update");
        if notice.is_some() {
            self.state.draft.clear();
        }
        Ok(notice)
    }

    /// Asks for confirmation, then removes the record and persists.
    pub fn delete(
        &mut self,
        target: impl Into<SurveyTarget>,
        prompt: &mut dyn DeletePrompt,
    ) -> StoreResult<DeleteOutcome> {
        let target = target.into();
        let index = self.state.store.resolve(target)?;
        let answer = match self.state.store.get(index) {
            Some(record) => prompt.confirm_delete(record),
            None => Confirmation::Cancel,
        };
        if answer == Confirmation::Cancel {
            info!("event=survey_delete module=service status=cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let removed = self.state.store.remove(SurveyTarget::Index(index))?;
        if self.state.draft.editing() == Some(removed.id) {
            self.state.draft.clear();
        }

        let notice = if self.persist() {
            info!(
                "event=survey_delete module=service status=ok count={}",
                self.state.store.len()
            );
            Some(Notice::Deleted)
        } else {
            None
        };
        Ok(DeleteOutcome::Deleted { notice })
    }

    /// Writes the export file and hands it to `share`.
    ///
    /// Returns the written path, or `None` when writing or sharing failed.
    pub fn export(
        &mut self,
        exporter: &CsvExporter,
        share: &mut dyn ShareTarget,
    ) -> Option<PathBuf> {
        match exporter.export_and_share(self.state.store.records(), share) {
            Ok(path) => {
                self.state.status.record_success(PersistenceOp::Export);
                Some(path)
            }
            Err(err) => {
                error!(
                    "event=export module=service status=error error_code=export_failed error={}",
                    err
                );
                self.state
                    .status
                    .record_failure(PersistenceOp::Export, err.to_string());
                None
            }
        }
    }

    fn finish_save(&mut self, mode: &str) -> Option<Notice> {
        if self.persist() {
            info!(
                "event=survey_save module=service status=ok mode={} count={}",
                mode,
                self.state.store.len()
            );
            Some(Notice::Saved)
        } else {
            None
        }
    }

    fn persist(&mut self) -> bool {
        match self.repo.save_surveys(self.state.store.records()) {
            Ok(()) => {
                self.state.status.record_success(PersistenceOp::Save);
                true
            }
            Err(err) => {
                error!(
                    "event=surveys_persist module=service status=error error_code=write_failed error={}",
                    err
                );
                self.state
                    .status
                    .record_failure(PersistenceOp::Save, err.to_string());
                false
            }
        }
    }
}
