//! lwdwatch Entry Point

use clap::Parser;
use lwdwatch::cli::{check, registry, serve, Cli, Commands};
use lwdwatch::config::DirectoryConfig;
use lwdwatch::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.debug_enabled()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // 設定の解析失敗はスケジューラ起動前にプロセスを終了させる
    let mut config = match DirectoryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);

    let result = match &cli.command {
        Some(Commands::Serve(args)) => serve::execute(args, config).await,
        Some(Commands::Check(args)) => check::execute(args, &config).await,
        Some(Commands::Add(args)) => registry::execute_add(args, &config).await,
        Some(Commands::Remove(args)) => registry::execute_remove(args, &config).await,
        Some(Commands::List(args)) => registry::execute_list(args, &config).await,
        // No subcommand - default to serve
        None => serve::execute(&serve::ServeArgs::default(), config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
