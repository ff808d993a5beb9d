use refbot::{app::Application, config::load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = load_config()?;
    Application::build(config).await
}
