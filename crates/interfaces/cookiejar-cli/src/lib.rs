pub mod commands;
pub mod presenter;
pub mod settings;

use clap::ValueEnum;
use cookiejar_core::DeletePolicy;

pub use commands::CliContext;

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliDeletePolicy {
    /// Remove the entry and every entry after it
    Truncate,
    /// Remove only the entry
    Single,
}

impl From<CliDeletePolicy> for DeletePolicy {
    fn from(p: CliDeletePolicy) -> Self {
        match p {
            CliDeletePolicy::Truncate => DeletePolicy::Truncate,
            CliDeletePolicy::Single => DeletePolicy::Single,
        }
    }
}
