use std::process::ExitCode;

fn main() -> ExitCode {
    mathwhiz_cli::run()
}
