//! sysd-initctl - /dev/initctl compatibility for sysd
//!
//! Legacy tools (`telinit`, `shutdown`, `halt` from sysvinit) change the
//! runlevel by writing a fixed-size `struct init_request` into the
//! /dev/initctl FIFO. This crate reads those requests from the
//! socket-activated FIFO and turns runlevel changes into the signals the
//! service manager on PID 1 understands.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   init_request   ┌──────────┐   SIGRTMIN+n   ┌───────┐
//! │  telinit   │ ───────────────▶ │ listener │ ─────────────▶ │ PID 1 │
//! └────────────┘  /dev/initctl    └──────────┘   SIGHUP/TERM  └───────┘
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod listener;
pub mod logging;
pub mod request;
pub mod runlevel;

pub use config::{Config, UnhandledPolicy};
pub use error::InitctlError;
pub use listener::{run, LoopExit, LoopSummary};
pub use request::{Command, InitRequest, INIT_MAGIC, REQUEST_SIZE};
pub use runlevel::{change_runlevel, signal_for_runlevel, ProcessTarget, SignalTarget, TargetSignal};
