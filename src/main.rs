use std::env;

use mashup_suggestions::{
    api::HttpApi,
    app::App,
    config::{self, ClientConfig},
    controller::SiteController,
    logging, parse_args, print_help, print_version, tui, Invocation,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    match parse_args(&args) {
        Ok(Invocation::Run) => {}
        Ok(Invocation::Help) => {
            print_help("mashup-suggestions", "Browse and submit mashup suggestions");
            return Ok(());
        }
        Ok(Invocation::Version) => {
            print_version("mashup-suggestions");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }

    dotenvy::dotenv().ok();
    // the terminal belongs to the UI, so logs go to a file
    logging::init_file(&config::log_file())?;
    let config = ClientConfig::load()?;
    info!(api_url = %config.api_url, "Starting client");

    let controller = SiteController::new(HttpApi::new(config.api_url), config.success_delay);
    let mut app = App::new(controller);

    let mut terminal = tui::init()?;
    let app_result = app.run(&mut terminal).await;
    tui::restore()?;
    Ok(app_result?)
}
