use common::clap::{App, Arg, SubCommand};

pub fn optargs() -> App<'static, 'static> {
    SubCommand::with_name("list")
        .about("List the entries of a directory")
        .arg(
            Arg::with_name("DIRECTORY")
                .required(true)
                .help("The directory to list"),
        )
        .arg(
            Arg::with_name("batch")
                .short("b")
                .long("batch")
                .takes_value(true)
                .default_value("16")
                .help("Number of entries fetched per read"),
        )
        .arg(
            Arg::with_name("async")
                .short("a")
                .long("async")
                .help("Run the reads on the worker pool"),
        )
        .arg(
            Arg::with_name("workers")
                .short("w")
                .long("workers")
                .takes_value(true)
                .default_value("4")
                .help("Number of worker threads for --async"),
        )
        .arg(
            Arg::with_name("skip-dots")
                .long("skip-dots")
                .help("Leave out the '.' and '..' entries"),
        )
}
