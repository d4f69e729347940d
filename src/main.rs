use clap::Parser;

use quillpress::cli::{Cli, Commands};
use quillpress::config::{get_config, init_config_from};
use quillpress::errors::BlogError;
use quillpress::runtime::modes;
use quillpress::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { output } => modes::generate_config(output.as_deref()),
        Commands::Serve => {
            init_config_from(&cli.config);
            let config = get_config();

            // 在 main 作用域内持有 guard，保证退出前日志写完
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    let err = BlogError::file_operation(format!("{:#}", e));
                    eprintln!("{}", err.format_colored());
                    return Err(e);
                }
            };

            modes::run_server().await
        }
    }
}
