use clap::Parser;

use crmdesk::cli::{Cli, Commands};
use crmdesk::config::{get_config, init_config_from};
use crmdesk::runtime::modes::{run_cli, run_server};
use crmdesk::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            // guard 必须活到进程结束，否则缓冲日志会丢
            let _guard = init_logging(&config.logging)?;
            run_server().await
        }
        Some(cmd) => {
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
