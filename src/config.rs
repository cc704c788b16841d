//! Runtime configuration
//!
//! Everything is set from the command line; the defaults reproduce the
//! behaviour of the stock systemd-initctl service.

use clap::{Parser, ValueEnum};
use nix::unistd::Pid;
use std::time::Duration;

/// Default idle timeout before exiting
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do with valid requests other than RUNLVL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UnhandledPolicy {
    /// Drop them silently, like sysvinit compat always has
    #[default]
    Ignore,
    /// Drop them with an info line naming the command
    Log,
}

/// When to prefix log lines with sd-daemon `<N>` priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JournalPrefix {
    /// Only if stderr is connected to the journal
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "sysd-initctl")]
#[command(about = "Translate /dev/initctl requests into signals for init")]
#[command(
    long_about = "sysd-initctl reads legacy sysvinit requests from the socket-activated \
    /dev/initctl FIFO and forwards runlevel changes to init as signals. It exits \
    once the pipe has been idle for the configured timeout."
)]
pub struct Args {
    /// Process receiving runlevel signals
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..))]
    pub target_pid: i32,

    /// Seconds without requests before exiting
    #[arg(
        long,
        default_value_t = DEFAULT_IDLE_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub idle_timeout: u64,

    /// Policy for requests other than runlevel changes
    #[arg(long, value_enum, default_value_t)]
    pub unhandled: UnhandledPolicy,

    /// Severity prefixes on log lines
    #[arg(long, value_enum, default_value_t)]
    pub journal_prefix: JournalPrefix,
}

/// Settings for the request loop
#[derive(Debug, Clone)]
pub struct Config {
    pub target_pid: Pid,
    pub idle_timeout: Duration,
    pub unhandled: UnhandledPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_pid: Pid::from_raw(1),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            unhandled: UnhandledPolicy::default(),
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            target_pid: Pid::from_raw(args.target_pid),
            idle_timeout: Duration::from_secs(args.idle_timeout),
            unhandled: args.unhandled,
        }
    }
}
