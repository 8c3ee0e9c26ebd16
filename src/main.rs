use placepicker::config::Config;
use placepicker::engine::Engine;
use placepicker::server::serve;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load().unwrap();

    let engine = Engine::new(&config.data_dir).await.unwrap();

    serve(engine, &config).await.unwrap();
}
