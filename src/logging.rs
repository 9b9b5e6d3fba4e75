use std::sync::atomic::{AtomicU64, Ordering};

use common::log::{self, LevelFilter};
use common::{chrono, clap::ArgMatches, fern};

/// -q silences everything, -d/-dd select debug/trace, each -v adds one level
fn level_filter(quiet: bool, debug: u64, verbose: u64) -> LevelFilter {
    let base = match (quiet, debug) {
        (_, 1) => 4,
        (_, d) if d > 1 => 5,
        (true, _) => 0,
        _ => 1,
    };

    match base + verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub(crate) fn init_logging(matches: &ArgMatches) -> Result<(), fern::InitError> {
    let level = level_filter(
        matches.is_present("quiet"),
        matches.occurrences_of("debug"),
        matches.occurrences_of("verbose"),
    );

    use fern::colors::Color::*;
    let colors = fern::colors::ColoredLevelConfig::new()
        .error(Red)
        .warn(Yellow)
        .info(Green)
        .debug(Black)
        .trace(BrightBlack);

    let counter = AtomicU64::new(0);
    let seq_num = move || counter.fetch_add(1, Ordering::SeqCst);

    let mut logger = fern::Dispatch::new();

    if matches.is_present("debug") {
        // workers are named 'dirstream-worker-<n>', completions run on 'main'
        logger = logger.format(move |out, message, record| {
            let thread = std::thread::current();
            out.finish(format_args!(
                "{:0>12}: {:>5}: {}:{}: {}: {}",
                seq_num(),
                colors.color(record.level()),
                record.file().unwrap_or(""),
                record.line().unwrap_or(0),
                thread.name().unwrap_or("UNKNOWN"),
                message
            ))
        });
    } else {
        logger = logger.format(move |out, message, record| {
            out.finish(format_args!("{:>5}: {}", colors.color(record.level()), message))
        });
    }

    // stdout carries the listing
    logger = logger.level(level).chain(std::io::stderr());

    if let Some(logfile) = matches.value_of_os("logfile") {
        logger = logger.chain(fern::log_file(logfile)?);
    }

    logger.apply()?;

    std::panic::set_hook(Box::new(|i| {
        log::error!(
            "panic at: {}:{}:",
            i.location().map_or("", |l| l.file()),
            i.location().map_or(0, |l| l.line())
        );
    }));

    log::info!("START: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(level_filter(false, 0, 0), LevelFilter::Error);
        assert_eq!(level_filter(true, 0, 0), LevelFilter::Off);
        assert_eq!(level_filter(false, 0, 2), LevelFilter::Info);
        assert_eq!(level_filter(false, 1, 0), LevelFilter::Debug);
        assert_eq!(level_filter(false, 2, 0), LevelFilter::Trace);
        assert_eq!(level_filter(true, 1, 0), LevelFilter::Debug);
        assert_eq!(level_filter(false, 0, 9), LevelFilter::Trace);
    }
}
