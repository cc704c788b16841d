//! Fatal errors and their exit statuses

use std::process::ExitCode;

/// sysexits.h codes
pub const EX_NOINPUT: u8 = 66;
pub const EX_OSERR: u8 = 71;
pub const EX_IOERR: u8 = 74;

/// Conditions that end the process
///
/// Request-local problems (bogus records, unknown runlevels, failed
/// signal delivery) are logged by the loop and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum InitctlError {
    #[error("Exactly one file descriptor must be passed from systemd, got {0}")]
    Descriptors(usize),

    #[error("Invalid socket activation environment: {0}")]
    Activation(#[source] std::io::Error),

    #[error("Error waiting for input: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Error reading from pipe: {0}")]
    Read(#[source] std::io::Error),
}

impl InitctlError {
    pub fn exit_status(&self) -> u8 {
        match self {
            InitctlError::Descriptors(_) | InitctlError::Activation(_) => EX_NOINPUT,
            InitctlError::Wait(_) => EX_OSERR,
            InitctlError::Read(_) => EX_IOERR,
        }
    }
}

impl From<&InitctlError> for ExitCode {
    fn from(err: &InitctlError) -> Self {
        ExitCode::from(err.exit_status())
    }
}
