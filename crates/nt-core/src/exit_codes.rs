//! Process exit codes for the CLI.
//!
//! - 0-9: the run finished; the code says how cleanly
//! - 10-19: bad input the user can fix
//! - 20-29: failures in the environment

use nt_common::{Error, ErrorCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every record enriched without issues.
    Clean = 0,

    /// Output was written but some records had structural issues.
    PartialFail = 3,

    /// Invalid arguments, a malformed snapshot or a malformed label table.
    ArgsError = 10,

    /// The configuration file failed to load or validate.
    ConfigError = 11,

    /// Reading or writing a file failed.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_error(self) -> bool {
        self.as_i32() >= 10
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialFail => "ERR_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::IoError => "ERR_IO",
        }
    }

    pub fn for_error(err: &Error) -> ExitCode {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Data | ErrorCategory::Join => ExitCode::ArgsError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
