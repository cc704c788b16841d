//! Socket activation handshake with the service manager
//!
//! systemd opens /dev/initctl from `systemd-initctl.socket` and passes it
//! as fd 3 (LISTEN_PID/LISTEN_FDS). Readiness is reported over
//! NOTIFY_SOCKET once the descriptor checks out.

use std::fs::File;
use std::os::unix::io::{FromRawFd, OwnedFd, RawFd};

use sd_notify::NotifyState;

use crate::error::InitctlError;

/// Pick the only descriptor out of `fds`
pub fn single_descriptor<I>(fds: I) -> Result<RawFd, InitctlError>
where
    I: IntoIterator<Item = RawFd>,
{
    let fds: Vec<RawFd> = fds.into_iter().collect();
    match fds[..] {
        [fd] => Ok(fd),
        _ => Err(InitctlError::Descriptors(fds.len())),
    }
}

/// Take ownership of the activated control pipe
pub fn take_control_pipe() -> Result<File, InitctlError> {
    let fds = sd_notify::listen_fds().map_err(InitctlError::Activation)?;
    let fd = single_descriptor(fds)?;

    log::debug!("Received control pipe as fd {}", fd);

    // SAFETY:
    // The service manager handed this fd to us and nothing else in the
    // process refers to it.
    let fd = unsafe { OwnedFd::from_raw_fd(fd) };
    Ok(File::from(fd))
}

/// Tell the service manager we are serving requests
///
/// Without NOTIFY_SOCKET this does nothing. Failures are logged only.
pub fn notify_ready() {
    let states = [
        NotifyState::Ready,
        NotifyState::Status("Processing requests..."),
    ];
    if let Err(e) = sd_notify::notify(false, &states) {
        log::warn!("Failed to send readiness notification: {}", e);
    }
}
