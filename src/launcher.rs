//! Launcher
//!
//! Ties the pieces together for a front end: one audit log per session, the
//! latest catalog snapshot, the user's selection and a batch runner. The
//! three user actions (run selected, run all, restore selected) ask a
//! [`ConfirmationPort`] before anything is executed.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::audit::AuditLog;
use crate::catalog::{self, resolve_undo, ScriptCatalog, UndoResolution};
use crate::config::Config;
use crate::error::Result;
use crate::execution::{InterpreterExecutor, ScriptExecutor};
use crate::models::{BatchItem, BatchSummary, ScriptCategory, ScriptEntry};
use crate::platform::Platform;
use crate::runner::{BatchObserver, BatchRunner};
use crate::state::Selection;

/// What the user is being asked to approve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRequest {
    /// Continue without administrator or root rights
    NotElevated { count: usize },
    /// Run the selected entries
    RunSelected { count: usize },
    /// Run every entry in the catalog
    RunAll { count: usize },
    /// Run the undo counterparts of the selected entries
    Restore { count: usize },
}

impl ConfirmRequest {
    /// Number of scripts that would run
    pub fn count(&self) -> usize {
        match self {
            ConfirmRequest::NotElevated { count }
            | ConfirmRequest::RunSelected { count }
            | ConfirmRequest::RunAll { count }
            | ConfirmRequest::Restore { count } => *count,
        }
    }

    /// Question to put in front of the user
    pub fn prompt(&self) -> String {
        match self {
            ConfirmRequest::NotElevated { .. } => {
                "Not running as administrator. Some scripts may fail. Continue?".to_string()
            }
            ConfirmRequest::RunSelected { count } => format!(
                "Run {} selected script(s)? This will execute local scripts.",
                count
            ),
            ConfirmRequest::RunAll { count } => format!(
                "Run ALL {} available script(s)? This will execute local scripts.",
                count
            ),
            ConfirmRequest::Restore { count } => {
                format!("Run {} undo script(s) for the selected entries?", count)
            }
        }
    }
}

/// Asks the user before a batch starts
pub trait ConfirmationPort: Send + Sync {
    /// `true` to go ahead
    fn confirm(&self, request: &ConfirmRequest) -> bool;
}

/// Approves everything
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl ConfirmationPort for AutoConfirm {
    fn confirm(&self, _request: &ConfirmRequest) -> bool {
        true
    }
}

/// Result of a user action
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    /// The action needs a selection and there was none
    NothingSelected,
    /// None of the selected entries has an undo counterpart
    NothingToUndo,
    /// The confirmation port said no
    Declined,
    /// The batch ran
    Completed(BatchSummary),
}

/// Session-level facade over catalog, selection and runner
pub struct Launcher {
    config: Config,
    audit: Arc<AuditLog>,
    catalog: ScriptCatalog,
    categories: Vec<ScriptCategory>,
    selection: Selection,
    runner: Arc<BatchRunner>,
    confirmation: Box<dyn ConfirmationPort>,
    elevated: bool,
}

impl Launcher {
    /// Start a session running scripts through the configured interpreter
    pub fn new(config: Config, confirmation: Box<dyn ConfirmationPort>) -> Self {
        let audit = Arc::new(AuditLog::open(config.logs_dir()));
        let executor = Arc::new(InterpreterExecutor::new(
            &config.interpreter,
            Arc::clone(&audit),
        ));
        Self::assemble(config, audit, executor, confirmation)
    }

    /// Start a session with a custom executor
    pub fn with_executor(
        config: Config,
        executor: Arc<dyn ScriptExecutor>,
        confirmation: Box<dyn ConfirmationPort>,
    ) -> Self {
        let audit = Arc::new(AuditLog::open(config.logs_dir()));
        Self::assemble(config, audit, executor, confirmation)
    }

    fn assemble(
        config: Config,
        audit: Arc<AuditLog>,
        executor: Arc<dyn ScriptExecutor>,
        confirmation: Box<dyn ConfirmationPort>,
    ) -> Self {
        let catalog = ScriptCatalog::new(config.interpreter.extension.clone(), Arc::clone(&audit))
            .with_hidden_undo_scripts(config.catalog.hide_undo_scripts);
        let runner = Arc::new(BatchRunner::new(executor, Arc::clone(&audit)));

        info!(
            "{} v{} started, scripts in {}",
            crate::NAME,
            crate::VERSION,
            config.scripts_dir().display()
        );
        audit.log("ScriptDeck started.");

        let mut launcher = Self {
            config,
            audit,
            catalog,
            categories: Vec::new(),
            selection: Selection::new(),
            runner,
            confirmation,
            elevated: Platform::privileges().is_elevated(),
        };
        launcher.rescan();
        launcher
    }

    /// Override the detected privilege level
    pub fn with_elevation(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Whether the session has administrator or root rights
    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// Rebuild the catalog snapshot; selections of vanished entries are dropped
    pub fn rescan(&mut self) -> &[ScriptCategory] {
        self.categories = self.catalog.scan(&self.config.scripts_dir());
        self.selection
            .retain_known(catalog::all_entries(&self.categories));
        &self.categories
    }

    pub fn categories(&self) -> &[ScriptCategory] {
        &self.categories
    }

    /// Every entry of the current snapshot, category by category
    pub fn entries(&self) -> impl Iterator<Item = &ScriptEntry> {
        catalog::all_entries(&self.categories)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Shared runner, e.g. for [`BatchRunner::spawn_batch`]
    pub fn runner(&self) -> &Arc<BatchRunner> {
        &self.runner
    }

    /// Selected entries in catalog order
    pub fn selected_entries(&self) -> Vec<&ScriptEntry> {
        self.selection.pick(self.entries())
    }

    /// Run the selected entries
    pub async fn run_selected(
        &self,
        observer: &dyn BatchObserver,
        cancel: &CancellationToken,
    ) -> Result<LaunchOutcome> {
        let items: Vec<BatchItem> = self
            .selected_entries()
            .into_iter()
            .map(BatchItem::from)
            .collect();
        if items.is_empty() {
            debug!("Run requested with an empty selection");
            return Ok(LaunchOutcome::NothingSelected);
        }

        if self.should_warn_not_elevated() {
            let warning = ConfirmRequest::NotElevated { count: items.len() };
            if !self.confirmation.confirm(&warning) {
                info!("Run declined without elevated rights");
                return Ok(LaunchOutcome::Declined);
            }
        }

        let request = ConfirmRequest::RunSelected { count: items.len() };
        self.confirm_and_run(request, items, observer, cancel).await
    }

    /// Run every entry in the catalog
    pub async fn run_all(
        &self,
        observer: &dyn BatchObserver,
        cancel: &CancellationToken,
    ) -> Result<LaunchOutcome> {
        let items: Vec<BatchItem> = self.entries().map(BatchItem::from).collect();
        let request = ConfirmRequest::RunAll { count: items.len() };
        self.confirm_and_run(request, items, observer, cancel).await
    }

    /// Run the undo counterparts of the selected entries
    pub async fn restore_selected(
        &self,
        observer: &dyn BatchObserver,
        cancel: &CancellationToken,
    ) -> Result<LaunchOutcome> {
        let selected = self.selected_entries();
        if selected.is_empty() {
            debug!("Restore requested with an empty selection");
            return Ok(LaunchOutcome::NothingSelected);
        }

        let items = match resolve_undo(selected) {
            UndoResolution::NothingToUndo => {
                info!("No undo scripts found for the selected entries");
                return Ok(LaunchOutcome::NothingToUndo);
            }
            UndoResolution::Batch(items) => items,
        };

        let request = ConfirmRequest::Restore { count: items.len() };
        self.confirm_and_run(request, items, observer, cancel).await
    }

    fn should_warn_not_elevated(&self) -> bool {
        let runner = &self.config.runner;
        runner.confirm && runner.warn_when_not_elevated && !self.elevated
    }

    async fn confirm_and_run(
        &self,
        request: ConfirmRequest,
        items: Vec<BatchItem>,
        observer: &dyn BatchObserver,
        cancel: &CancellationToken,
    ) -> Result<LaunchOutcome> {
        if self.config.runner.confirm && !self.confirmation.confirm(&request) {
            info!("Batch of {} declined", request.count());
            return Ok(LaunchOutcome::Declined);
        }

        let summary = self.runner.run_batch(&items, observer, cancel).await?;
        Ok(LaunchOutcome::Completed(summary))
    }
}
