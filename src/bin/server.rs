use std::env;

use mashup_suggestions::{
    config::ServerConfig, logging, parse_args, print_help, print_version, server::start_server,
    Invocation,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    match parse_args(&args) {
        Ok(Invocation::Run) => {}
        Ok(Invocation::Help) => {
            print_help("mashup-server", "Serve the suggestion endpoints");
            return Ok(());
        }
        Ok(Invocation::Version) => {
            print_version("mashup-server");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }

    dotenvy::dotenv().ok();
    logging::init_stdout()?;

    let config = ServerConfig::load()?;
    start_server(config).await
}
