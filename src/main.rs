use argh::FromArgs;
use weather_etl::{pipeline, Config};

#[derive(FromArgs)]
/// Hourly weather ETL: fetch forecast, load SQLite, render chart, publish.
struct Args {
    /// path to the YAML configuration file (optional, defaults apply)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// run the ETL but skip the git commit and push
    #[argh(switch)]
    skip_publish: bool,
}

#[tokio::main]
async fn main() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let config = if let Some(config_path) = &args.config {
        match Config::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config from '{}': {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if let Err(e) = pipeline::run(&config, args.skip_publish).await {
        log::error!("ETL run failed: {:#}", e);
        std::process::exit(1);
    }
}
