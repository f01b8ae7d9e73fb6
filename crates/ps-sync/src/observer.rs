//! Setup notifications for tooling that audits or extends directive handling.

use ps_core::EquipmentId;
use ps_directive::Directive;
use ps_model::PathElement;

use crate::LineOutcome;

/// Everything known about one source line after it was interpreted.
pub struct LineContext<'a> {
    pub equipment:  EquipmentId,
    pub name:       &'a str,
    /// 1-based.
    pub line:       usize,
    pub text:       &'a str,
    pub comment:    Option<&'a str>,
    pub elements:   &'a [PathElement],
    pub directives: &'a [Directive],
    pub outcome:    &'a LineOutcome,
}

/// Totals reported once setup is complete.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct SetupSummary {
    pub equipment:        usize,
    pub wait_counters:    usize,
    pub time_constraints: usize,
    /// Effects still waiting on a date, a completion or a selection.
    pub pending_effects:  usize,
}

/// Callbacks invoked by [`SyncRuntime`][crate::SyncRuntime] during setup.
///
/// Both methods default to no-ops.
///
/// # Example — directive audit
///
/// ```rust,ignore
/// struct Audit(Vec<String>);
///
/// impl SyncObserver for Audit {
///     fn on_line_processed(&mut self, ctx: &LineContext<'_>) {
///         for d in ctx.directives {
///             self.0.push(format!("{}:{} {:?}", ctx.name, ctx.line, d.kind()));
///         }
///     }
/// }
/// ```
pub trait SyncObserver {
    /// Called once per physical line of every parsed path, comment or not.
    fn on_line_processed(&mut self, _ctx: &LineContext<'_>) {}

    /// Called once, after every equipment path has been parsed.
    fn on_setup_completed(&mut self, _summary: &SetupSummary) {}
}

/// A [`SyncObserver`] that does nothing.
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}
