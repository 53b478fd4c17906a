use std::process;

mod headless;
mod io;
mod logging;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let parsed = match headless::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("prt: {err:#}");
            process::exit(2);
        }
    };
    if parsed.help {
        headless::print_help();
        return;
    }

    logging::setup_tracing(parsed.log_level);
    tracing::info!("prt starting");

    if let Err(err) = headless::run(&parsed) {
        tracing::error!("{err:#}");
        eprintln!("prt error: {err:#}");
        process::exit(1);
    }
}
