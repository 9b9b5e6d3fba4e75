use std::io;

use common::anyhow;
use common::clap::AppSettings;
use common::fern;
use common::libc;
use common::log;

mod logging;
mod optargs;
use self::optargs::dirstream_optargs;

fn error_to_exitcode(error: &anyhow::Error) -> i32 {
    if let Some(err) = error.downcast_ref::<dirhandle::DirError>() {
        err.errno()
    } else if let Some(err) = error.downcast_ref::<io::Error>() {
        err.raw_os_error().unwrap_or(libc::EXIT_FAILURE)
    } else {
        libc::EXIT_FAILURE
    }
}

fn main() {
    let matches = dirstream_optargs()
        .setting(AppSettings::SubcommandRequired)
        .subcommand(dirhandle::optargs())
        .get_matches();

    if let Err(err) = logging::init_logging(&matches) {
        eprintln!("Error: initializing logging: {}", err);
        std::process::exit(match err {
            fern::InitError::Io(err) => err.raw_os_error().unwrap_or(libc::EXIT_FAILURE),
            fern::InitError::SetLoggerError(_) => libc::EXIT_FAILURE,
        });
    }

    if let Err(err) = match matches.subcommand() {
        ("list", Some(sub_m)) => dirhandle::cmd(sub_m),
        (name, _) => {
            unimplemented!("subcommand '{}'", name)
        }
    } {
        log::error!("Error: {:#}", &err);
        std::process::exit(error_to_exitcode(&err));
    } else {
        log::info!("OK");
    }
}
