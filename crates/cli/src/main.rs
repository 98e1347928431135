use std::process::ExitCode;

fn main() -> ExitCode {
    astra_cli::run()
}
