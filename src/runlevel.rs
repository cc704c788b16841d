//! Runlevel to signal translation
//!
//! systemd accepts these signals on PID 1 as shorthands for
//! `systemctl isolate`/`daemon-reload`/`daemon-reexec`.

use nix::errno::Errno;
use nix::unistd::Pid;
use std::fmt;

/// Signals understood by the supervising init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSignal {
    /// SIGRTMIN+0, default.target
    Default,
    /// SIGRTMIN+1, rescue.target
    Rescue,
    /// SIGRTMIN+4, poweroff.target
    Poweroff,
    /// SIGRTMIN+5, reboot.target
    Reboot,
    /// SIGHUP, daemon-reload
    Reload,
    /// SIGTERM, daemon-reexec
    Reexecute,
}

impl TargetSignal {
    /// Raw signal number
    pub fn signo(self) -> libc::c_int {
        match self {
            TargetSignal::Default => libc::SIGRTMIN(),
            TargetSignal::Rescue => libc::SIGRTMIN() + 1,
            TargetSignal::Poweroff => libc::SIGRTMIN() + 4,
            TargetSignal::Reboot => libc::SIGRTMIN() + 5,
            TargetSignal::Reload => libc::SIGHUP,
            TargetSignal::Reexecute => libc::SIGTERM,
        }
    }
}

impl fmt::Display for TargetSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signo())
    }
}

/// Map a legacy runlevel character to its signal
pub fn signal_for_runlevel(runlevel: char) -> Option<TargetSignal> {
    match runlevel {
        '0' => Some(TargetSignal::Poweroff),
        '1' | 'S' | 's' => Some(TargetSignal::Rescue),
        '2' | '3' | '4' | '5' => Some(TargetSignal::Default),
        '6' => Some(TargetSignal::Reboot),
        'Q' | 'q' => Some(TargetSignal::Reload),
        'U' | 'u' => Some(TargetSignal::Reexecute),
        _ => None,
    }
}

/// Receiver of runlevel signals
pub trait SignalTarget {
    fn send(&mut self, signal: TargetSignal) -> Result<(), Errno>;

    /// Human-readable name used in diagnostics
    fn describe(&self) -> String;
}

/// Delivers signals to a real process with kill(2)
#[derive(Debug, Clone, Copy)]
pub struct ProcessTarget {
    pid: Pid,
}

impl ProcessTarget {
    pub fn new(pid: Pid) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }
}

impl Default for ProcessTarget {
    fn default() -> Self {
        Self::new(Pid::from_raw(1))
    }
}

impl SignalTarget for ProcessTarget {
    fn send(&mut self, signal: TargetSignal) -> Result<(), Errno> {
        // SAFETY:
        // kill(2) takes no pointers. libc is used because
        // nix::sys::signal::Signal has no realtime signals.
        let ret = unsafe { libc::kill(self.pid.as_raw(), signal.signo()) };
        Errno::result(ret).map(drop)
    }

    fn describe(&self) -> String {
        format!("pid {}", self.pid)
    }
}

/// Act on a RUNLVL request
///
/// Returns the signal that was delivered, if any. Unknown runlevels and
/// delivery failures are logged and otherwise ignored.
pub fn change_runlevel<T: SignalTarget>(runlevel: i32, target: &mut T) -> Option<TargetSignal> {
    let code = u8::try_from(runlevel).ok().map(char::from);
    let Some(signal) = code.and_then(signal_for_runlevel) else {
        match code {
            Some(c) => log::warn!(
                "Got request for unknown runlevel {}, ignoring",
                c.escape_default()
            ),
            None => log::warn!("Got request for unknown runlevel {}, ignoring", runlevel),
        }
        return None;
    };

    match target.send(signal) {
        Ok(()) => {
            log::debug!("Sent signal {} to {}", signal, target.describe());
            Some(signal)
        }
        Err(e) => {
            log::error!(
                "Error sending signal {} to {}: {}",
                signal,
                target.describe(),
                e
            );
            None
        }
    }
}
