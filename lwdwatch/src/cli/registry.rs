//! add / remove / list サブコマンド
//!
//! サーバーを介さずにRegistry Storeを直接操作します。

use clap::Args;

use crate::bootstrap::open_repository;
use crate::config::DirectoryConfig;
use crate::registry::ServerRegistry;
use crate::types::server::{ListFilter, Server};

/// add サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Server address, e.g. https://node.example.com:9067
    pub address: String,
}

/// remove サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Identity (host:port) or any address normalizing to it
    pub target: String,
}

/// list サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Include validated servers that are currently down
    #[arg(long)]
    pub include_down: bool,

    /// Include servers that have not passed a probe yet
    #[arg(long)]
    pub include_unvalidated: bool,

    /// Shorthand for --include-down --include-unvalidated
    #[arg(short, long)]
    pub all: bool,
}

impl ListArgs {
    /// 引数に対応する一覧フィルタ
    pub fn filter(&self) -> ListFilter {
        if self.all {
            return ListFilter::ALL;
        }
        ListFilter {
            include_unvalidated: self.include_unvalidated,
            include_down: self.include_down,
        }
    }
}

async fn open_registry(config: &DirectoryConfig) -> anyhow::Result<ServerRegistry> {
    Ok(ServerRegistry::new(open_repository(config).await?))
}

/// Execute the add command
pub async fn execute_add(args: &AddArgs, config: &DirectoryConfig) -> anyhow::Result<()> {
    let registry = open_registry(config).await?;
    let server = registry.submit(&args.address).await?;
    println!(
        "Server successfully added! ({}) It will be listed after its first successful check.",
        server.identity
    );
    Ok(())
}

/// Execute the remove command
pub async fn execute_remove(args: &RemoveArgs, config: &DirectoryConfig) -> anyhow::Result<()> {
    let registry = open_registry(config).await?;
    let server = registry.remove(&args.target).await?;
    println!("Removed {}", server.identity);
    Ok(())
}

/// Execute the list command
pub async fn execute_list(args: &ListArgs, config: &DirectoryConfig) -> anyhow::Result<()> {
    let registry = open_registry(config).await?;
    let servers = registry.list(args.filter()).await?;

    if servers.is_empty() {
        println!("No servers");
        return Ok(());
    }

    println!("ADDRESS\tCHAIN\tHEIGHT\tSTATUS\tLAST CHECKED");
    for server in &servers {
        println!("{}", format_row(server));
    }
    Ok(())
}

fn status_label(server: &Server) -> &'static str {
    match (server.validated, server.reachable) {
        (false, _) => "pending",
        (true, true) => "up",
        (true, false) => "down",
    }
}

fn format_row(server: &Server) -> String {
    let last_checked = server
        .last_checked_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let chain = if server.chain_label.is_empty() {
        "-"
    } else {
        server.chain_label.as_str()
    };
    format!(
        "{}\t{}\t{}\t{}\t{}",
        server.raw_address,
        chain,
        server.height,
        status_label(server),
        last_checked
    )
}
