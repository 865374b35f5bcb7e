use std::process::ExitCode;

fn main() -> ExitCode {
    mvnrun_lib::run()
}
