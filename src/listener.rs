//! Request loop for the /dev/initctl pipe
//!
//! Waits for the pipe to become readable, reads one record per wakeup and
//! forwards runlevel changes to the signal target. Returns when the writer
//! side goes away or nothing arrives within the idle timeout.

use std::fs::File;
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use crate::config::{Config, UnhandledPolicy};
use crate::error::InitctlError;
use crate::request::{Command, InitRequest, REQUEST_SIZE};
use crate::runlevel::{change_runlevel, SignalTarget};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Read returned end of file
    Closed,
    /// Idle timeout elapsed
    Idle,
}

/// Outcome of a completed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub exit: LoopExit,
    /// Structurally valid requests, whatever their command
    pub handled: usize,
    /// Discarded records
    pub bogus: usize,
}

/// Serve requests from `pipe` until it closes or goes idle
///
/// Takes ownership of the pipe; it is closed when this returns.
pub async fn run<T: SignalTarget>(
    pipe: File,
    config: &Config,
    target: &mut T,
) -> Result<LoopSummary, InitctlError> {
    set_nonblocking(&pipe).map_err(InitctlError::Wait)?;
    let pipe = AsyncFd::with_interest(pipe, Interest::READABLE).map_err(InitctlError::Wait)?;

    let mut handled = 0;
    let mut bogus = 0;
    let mut buf = [0u8; REQUEST_SIZE];

    log::debug!(
        "Waiting for requests on fd {} (idle timeout {:?})",
        pipe.get_ref().as_raw_fd(),
        config.idle_timeout
    );

    let exit = loop {
        let mut guard = match tokio::time::timeout(config.idle_timeout, pipe.readable()).await {
            Err(_) => break LoopExit::Idle,
            Ok(Err(e)) => return Err(InitctlError::Wait(e)),
            Ok(Ok(guard)) => guard,
        };

        let len = match guard.try_io(|inner| inner.get_ref().read(&mut buf)) {
            // Spurious wakeup, readiness already cleared
            Err(_would_block) => continue,
            Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Ok(Err(e)) => return Err(InitctlError::Read(e)),
            Ok(Ok(0)) => break LoopExit::Closed,
            Ok(Ok(len)) => len,
        };

        let request = match InitRequest::parse(&buf[..len]) {
            Ok(request) => request,
            Err(reason) => {
                log::warn!("Received bogus request ({})", reason);
                bogus += 1;
                continue;
            }
        };
        handled += 1;

        match request.cmd {
            Command::Runlevel => {
                change_runlevel(request.runlevel, target);
            }
            other => {
                if config.unhandled == UnhandledPolicy::Log {
                    log::info!("Ignoring unsupported {} request", other);
                }
            }
        }
    };

    log::debug!(
        "Request loop finished ({:?}): {} handled, {} bogus",
        exit,
        handled,
        bogus
    );

    Ok(LoopSummary {
        exit,
        handled,
        bogus,
    })
}

fn set_nonblocking(pipe: &File) -> io::Result<()> {
    let fd = pipe.as_raw_fd();
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_nonblocking() {
        let (read_end, _write_end) = nix::unistd::pipe().unwrap();
        let pipe = File::from(read_end);
        set_nonblocking(&pipe).unwrap();

        let raw = fcntl(pipe.as_raw_fd(), FcntlArg::F_GETFL).unwrap();
        let flags = OFlag::from_bits_truncate(raw);
        assert!(flags.contains(OFlag::O_NONBLOCK));

        // Empty pipe with a live writer must not block
        let err = (&pipe).read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[tokio::test]
    async fn test_unpollable_descriptor_is_wait_error() {
        struct Never;
        impl SignalTarget for Never {
            fn send(
                &mut self,
                _: crate::runlevel::TargetSignal,
            ) -> Result<(), nix::errno::Errno> {
                panic!("no signal expected");
            }
            fn describe(&self) -> String {
                "never".to_string()
            }
        }

        // epoll refuses regular files
        let file = File::open(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")).unwrap();
        let err = run(file, &Config::default(), &mut Never).await.unwrap_err();
        assert!(matches!(err, InitctlError::Wait(_)), "{:?}", err);
        assert_eq!(err.exit_status(), crate::error::EX_OSERR);
    }
}
