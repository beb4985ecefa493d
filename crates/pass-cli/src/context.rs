use std::path::PathBuf;

use anyhow::Context;
use pass_config::PassConfig;
use pass_core::norms::NormativeTable;
use pass_store::{AssessmentService, FileRepository};

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;

/// Everything a store-backed command needs.
pub struct AppContext {
    pub config: PassConfig,
    pub service: AssessmentService<FileRepository>,
}

impl AppContext {
    /// Open the file store named by `--data-dir` or the configuration.
    pub fn init(
        config: PassConfig,
        norms: NormativeTable,
        flags: &GlobalFlags,
    ) -> anyhow::Result<Self> {
        let data_dir = match &flags.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => config.storage.resolved_data_dir()?,
        };
        let repo = FileRepository::open(&data_dir)
            .with_context(|| format!("failed to open store at {}", data_dir.display()))?;
        tracing::debug!(data_dir = %data_dir.display(), norms = %norms.version, "store ready");
        Ok(Self {
            config,
            service: AssessmentService::new(repo, norms),
        })
    }

    /// History limit: `--limit` first, then `general.history_limit`.
    pub fn history_limit(&self, flags: &GlobalFlags) -> Option<usize> {
        effective_limit(flags.limit, self.config.general.history_limit)
    }
}
