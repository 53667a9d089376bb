use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Policy deciding the process exit status once every command has run.
///
/// The original client switched this rule on a hidden test-mode flag; here it
/// is explicit configuration so the behaviour is chosen, not inferred.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    EnumString,
    Display,
    ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ExitPolicy {
    /// Exit 0 when at least one command finished with status 0; otherwise
    /// propagate the last command's status.
    #[default]
    AnyZero,
    /// Exit 0 whenever every command completed, regardless of statuses.
    Completion,
}

impl ExitPolicy {
    /// Computes the process exit status from the recorded completion
    /// statuses, assuming every queued command ran to completion.
    #[must_use]
    pub fn resolve(self, statuses: &[i32]) -> i32 {
        match self {
            Self::Completion => 0,
            Self::AnyZero => {
                if statuses.iter().any(|status| *status == 0) {
                    0
                } else {
                    statuses.last().copied().unwrap_or(0)
                }
            }
        }
    }
}
