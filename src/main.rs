use anyhow::Result;
use chatkeys::cli;

fn main() -> Result<()> {
    // Parse arguments first so --help and --version stay out of the log
    let options = cli::process_cli();

    // Routes log::info!() etc. to the debug log file, mirrored to stderr
    // when RUST_LOG is set. --log-level wins over RUST_LOG and DEBUG_LEVEL.
    chatkeys::debug::init_log_bridge(options.log_level);
    log::info!("Starting chatkeys {}", chatkeys::VERSION);

    let code = match cli::run(options) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("chatkeys: error: {e:#}");
            1
        }
    };
    log::info!("Exiting with code {}", code);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
