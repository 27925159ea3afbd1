pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod database;
pub mod error;
pub mod form;
pub mod logging;
pub mod routes;
pub mod server;
pub mod suggestion;
pub mod text_box;
pub mod tui;

use error::ArgumentError;

/// What a binary was asked to do on its command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Run,
    Help,
    Version,
}

pub fn parse_args(args: &[String]) -> Result<Invocation, ArgumentError> {
    match args {
        [_] => Ok(Invocation::Run),
        [_, flag] => match flag.as_str() {
            "-h" | "--help" => Ok(Invocation::Help),
            "-v" | "--version" => Ok(Invocation::Version),
            other => Err(ArgumentError::InvalidArgument(other.to_string())),
        },
        _ => Err(ArgumentError::InvalidNumberOfArguments),
    }
}

pub fn print_help(binary: &str, summary: &str) {
    println!(
        "\nUsage: {binary} [OPTIONS]\n
    \nOptions: 
    \n  <NONE> \t\t{summary}
    \n  -v, --version \tPrint version information
    \n  -h, --help \t\tPrint help (you are here)\n"
    );
}

pub fn print_version(binary: &str) {
    println!("\n{binary} v{}\n", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_flags_runs() {
        assert_eq!(parse_args(&args(&["mashup-server"])), Ok(Invocation::Run));
    }

    #[test]
    fn recognises_help_and_version() {
        assert_eq!(parse_args(&args(&["x", "--help"])), Ok(Invocation::Help));
        assert_eq!(parse_args(&args(&["x", "-h"])), Ok(Invocation::Help));
        assert_eq!(parse_args(&args(&["x", "-v"])), Ok(Invocation::Version));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert_eq!(
            parse_args(&args(&["x", "--port"])),
            Err(ArgumentError::InvalidArgument("--port".into()))
        );
        assert_eq!(
            parse_args(&args(&["x", "-h", "-v"])),
            Err(ArgumentError::InvalidNumberOfArguments)
        );
    }
}
