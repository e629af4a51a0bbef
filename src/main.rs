use anyhow::Context;
use todo_list::configuration::get_configuration;
use todo_list::startup::Application;
use todo_list::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("todo_list".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let application = Application::build(&configuration)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build the application: {}", e))?;
    application
        .server
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("The server stopped unexpectedly: {}", e))?;
    Ok(())
}
