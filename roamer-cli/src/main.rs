//! Entry point for the `roamer` command-line interface.
#![forbid(unsafe_code)]

use roamer_cli::CliError;

fn main() {
    match roamer_cli::run() {
        Ok(()) => {}
        // Help and version requests exit 0 on stdout; usage errors exit 2.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on standard error"
)]
fn report(err: &CliError) {
    eprintln!("roamer: {err}");
}
