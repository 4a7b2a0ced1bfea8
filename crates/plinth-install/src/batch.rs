use plinth_index::{Index, Target};

use crate::{
    Fetcher, InstallError, InstallOutcome, Installer, Phase, UninstallOutcome, Uninstaller,
};

/// Per-name results of a batch, in the order the names were given.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub results: Vec<(String, Result<T, InstallError>)>,
}

impl<T> BatchReport<T> {
    /// False if any item failed.
    pub fn is_success(&self) -> bool { self.results.iter().all(|(_, result)| result.is_ok()) }

    pub fn succeeded(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &InstallError> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().err())
    }
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// Load each name from `index` and install it. Items run one after another;
/// a failure is recorded and the rest still run.
pub fn install_batch<F, I, S>(
    installer: &Installer<F>,
    index: &Index,
    names: I,
    target: &Target,
) -> BatchReport<InstallOutcome>
where
    F: Fetcher,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = BatchReport::default();
    for name in names {
        let name = name.as_ref();
        let result = index
            .load(name)
            .map_err(|e| InstallError {
                plugin:  name.to_string(),
                phase:   Phase::Resolving,
                failure: e.into(),
            })
            .and_then(|manifest| installer.install(&manifest, target));
        report.results.push((name.to_string(), result));
    }
    report
}

/// Uninstall each name, continuing past failures.
pub fn uninstall_batch<I, S>(uninstaller: &Uninstaller, names: I) -> BatchReport<UninstallOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = BatchReport::default();
    for name in names {
        let name = name.as_ref();
        report
            .results
            .push((name.to_string(), uninstaller.uninstall(name)));
    }
    report
}
