use common::clap::{self, App, Arg};

pub fn dirstream_optargs() -> App<'static, 'static> {
    App::new("dirstream")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about("batched directory listing, blocking or on a worker pool")
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .multiple(true)
                .help("Enable debug mode, twice for tracing"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Suppress any log output"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increment verbosity level"),
        )
        .arg(
            Arg::with_name("logfile")
                .long("logfile")
                .takes_value(true)
                .help("Additionally log into this file"),
        )
}
