//! Subcommand implementations and the state they share.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use drill_core::model::{QuestionBank, UserId};
use drill_core::{Clock, ProgressPolicy};
use services::ProgressService;
use storage::{JsonQuestionSource, Storage, load_bank};

use crate::db::prepare_sqlite_file;

pub mod record;
pub mod reset;
pub mod stats;
pub mod train;
pub mod validate;

/// Global options resolved once in `main`.
pub struct Context {
    pub questions: PathBuf,
    pub db_url: String,
    pub policy: ProgressPolicy,
    pub user: UserId,
}

impl Context {
    pub fn load_bank(&self) -> Result<QuestionBank> {
        load_bank(&JsonQuestionSource::new(&self.questions)).with_context(|| {
            format!(
                "failed to load question banks from {}",
                self.questions.display()
            )
        })
    }

    pub async fn progress_service(&self) -> Result<ProgressService> {
        prepare_sqlite_file(&self.db_url)?;
        let storage = Storage::sqlite(&self.db_url)
            .await
            .with_context(|| format!("failed to open progress database {}", self.db_url))?;
        Ok(ProgressService::new(
            Clock::default(),
            self.policy.clone(),
            storage.progress,
        ))
    }
}
