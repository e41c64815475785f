use log::error;
use log::LevelFilter;
use remindr::cli_parser::parse_cli_parameters_from;
use remindr::mail_smtp_relay::SmtpRelay;
use std::io::Write;

fn main() {
    // the log level is fixed, no environment variables are read
    #[cfg(debug_assertions)]
    let level = LevelFilter::Debug;
    #[cfg(not(debug_assertions))]
    let level = LevelFilter::Info;
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    let clap_arg_matches = match parse_cli_parameters_from(std::env::args_os()) {
        Ok(m) => m,
        Err(e) => {
            // help and version go to stdout and are no failure
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = remindr::run(&clap_arg_matches, &SmtpRelay) {
        error!("{}", &e);
        std::process::exit(1);
    }
}
