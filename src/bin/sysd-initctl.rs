//! sysd-initctl - /dev/initctl request daemon
//!
//! Started by `sysd-initctl.service` on demand through
//! `sysd-initctl.socket` (ListenFIFO=/run/initctl). Exits after
//! the pipe has been idle for a while; the socket restarts it.

use std::process::ExitCode;

use clap::Parser;

use sysd_initctl::activation;
use sysd_initctl::config::{Args, Config};
use sysd_initctl::logging;
use sysd_initctl::runlevel::ProcessTarget;
use sysd_initctl::InitctlError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    logging::init(args.journal_prefix);

    let config = Config::from(&args);

    match serve(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(&e)
        }
    }
}

async fn serve(config: &Config) -> Result<(), InitctlError> {
    let pipe = activation::take_control_pipe()?;

    activation::notify_ready();

    let mut target = ProcessTarget::new(config.target_pid);
    let summary = sysd_initctl::run(pipe, config, &mut target).await?;

    log::debug!(
        "Exiting after {} requests ({:?})",
        summary.handled,
        summary.exit
    );
    Ok(())
}
