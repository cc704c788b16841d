//! Log setup
//!
//! Lines go to stderr through env_logger. When stderr is the journal the
//! level is carried as an sd-daemon `<N>` prefix instead of text.

use std::io::Write;

use crate::config::JournalPrefix;

/// sd-daemon.h priority prefix for `level`
pub fn priority_prefix(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "<3>",
        log::Level::Warn => "<4>",
        log::Level::Info => "<6>",
        log::Level::Debug | log::Level::Trace => "<7>",
    }
}

fn use_prefix(mode: JournalPrefix) -> bool {
    match mode {
        JournalPrefix::Always => true,
        JournalPrefix::Never => false,
        JournalPrefix::Auto => std::env::var_os("JOURNAL_STREAM").is_some(),
    }
}

/// Install the global logger (RUST_LOG, default `info`)
pub fn init(mode: JournalPrefix) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if use_prefix(mode) {
        builder.format(|buf, record| {
            writeln!(buf, "{}{}", priority_prefix(record.level()), record.args())
        });
    }

    builder.init();
}
