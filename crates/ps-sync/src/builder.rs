//! Fluent builder for constructing a [`SyncRuntime`].

use log::debug;

use ps_core::SyncConfig;
use ps_model::{Case, EquipmentPath, ScheduleLibrary, compile_path};

use crate::{SyncResult, SyncRuntime};

/// Fluent builder for [`SyncRuntime`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                   |
/// |-----------------------|-------------------------------------------|
/// | `.library(l)`         | Empty `ScheduleLibrary`                   |
/// | `.compile_paths(b)`   | `true`: compile equipment with no elements |
///
/// # Example
///
/// ```rust,ignore
/// let mut runtime = RuntimeBuilder::new(config, case)
///     .library(library)
///     .build()?;
/// runtime.parse_all(&mut NoopObserver)?;
/// ```
pub struct RuntimeBuilder {
    config:  SyncConfig,
    case:    Case,
    library: Option<ScheduleLibrary>,
    compile: bool,
}

impl RuntimeBuilder {
    pub fn new(config: SyncConfig, case: Case) -> Self {
        Self { config, case, library: None, compile: true }
    }

    /// Other cases' schedules, read by `injectschedulepath`.
    pub fn library(mut self, library: ScheduleLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Whether to run [`compile_path`] for equipment whose path has no
    /// elements yet.  Turn off when the host supplies compiled paths.
    pub fn compile_paths(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    /// Validate the config, compile missing paths, and return a runtime
    /// ready for `parse_path`.
    pub fn build(self) -> SyncResult<SyncRuntime> {
        self.config.validate()?;
        let mut case = self.case;

        if self.compile {
            let compiled: Vec<(usize, EquipmentPath)> = case
                .equipment
                .iter()
                .enumerate()
                .filter(|(_, e)| e.path.is_empty() && !e.path_text.trim().is_empty())
                .map(|(i, e)| compile_path(&e.path_text, &case).map(|p| (i, p)))
                .collect::<Result<_, _>>()?;
            for (i, path) in compiled {
                debug!("{}: compiled {} element(s)", case.equipment[i].name, path.len());
                case.equipment[i].path = path;
            }
        }

        Ok(SyncRuntime::new(self.config, case, self.library.unwrap_or_default()))
    }
}
