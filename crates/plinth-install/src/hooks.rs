use std::fmt;

use crate::Warning;

/// Steps of an install. Uninstall reuses `Resolving`, `Swapping` and
/// `Cleanup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Resolving,
    Staging,
    Verifying,
    Swapping,
    Cleanup,
    Done,
    Aborted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Resolving => "resolving",
            Phase::Staging => "staging",
            Phase::Verifying => "verifying",
            Phase::Swapping => "swapping",
            Phase::Cleanup => "cleanup",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool { matches!(self, Phase::Done | Phase::Aborted) }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Observer for lifecycle events.
///
/// Hooks cannot influence the outcome; they exist so a front end can log or
/// render progress without the core doing any output itself.
pub trait InstallHook {
    /// Called on entry to every phase, including the terminal ones.
    fn phase(&self, _plugin: &str, _phase: Phase) {}

    /// Called for every non-fatal problem, as it happens.
    fn warning(&self, _plugin: &str, _warning: &Warning) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl InstallHook for NoopHook {}

impl<H: InstallHook + ?Sized> InstallHook for &H {
    fn phase(&self, plugin: &str, phase: Phase) { (**self).phase(plugin, phase) }

    fn warning(&self, plugin: &str, warning: &Warning) { (**self).warning(plugin, warning) }
}

/// Tracks the phase an operation is in and reports transitions to the hook.
pub(crate) struct Tracker<'a> {
    plugin: &'a str,
    phase:  Phase,
    hook:   &'a dyn InstallHook,
}

impl<'a> Tracker<'a> {
    pub(crate) fn start(plugin: &'a str, hook: &'a dyn InstallHook) -> Self {
        hook.phase(plugin, Phase::Resolving);
        Self {
            plugin,
            phase: Phase::Resolving,
            hook,
        }
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.hook.phase(self.plugin, phase);
    }

    /// Annotate `failure` with the plugin and current phase, and report the
    /// abort.
    pub(crate) fn fail(&self, failure: impl Into<crate::Failure>) -> crate::InstallError {
        self.hook.phase(self.plugin, Phase::Aborted);
        crate::InstallError {
            plugin:  self.plugin.to_string(),
            phase:   self.phase,
            failure: failure.into(),
        }
    }

    pub(crate) fn warn(&self, failure: impl Into<crate::Failure>, warnings: &mut Vec<Warning>) {
        let warning = Warning {
            phase:   self.phase,
            failure: failure.into(),
        };
        self.hook.warning(self.plugin, &warning);
        warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Phase>>);

    impl InstallHook for Recorder {
        fn phase(&self, _plugin: &str, phase: Phase) { self.0.borrow_mut().push(phase); }
    }

    #[test]
    fn test_tracker_reports_transitions() {
        let recorder = Recorder::default();
        let mut tracker = Tracker::start("foo", &recorder);
        tracker.enter(Phase::Staging);
        let err = tracker.fail(crate::Failure::NotInstalled);

        assert_eq!(err.phase, Phase::Staging);
        assert_eq!(err.plugin, "foo");
        assert_eq!(
            *recorder.0.borrow(),
            vec![Phase::Resolving, Phase::Staging, Phase::Aborted]
        );
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Verifying.to_string(), "verifying");
        assert!(Phase::Aborted.is_terminal());
        assert!(!Phase::Cleanup.is_terminal());
    }
}
