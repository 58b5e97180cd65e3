use clap::{Parser, Subcommand};

/// 社区博客后端
#[derive(Parser, Debug)]
#[command(name = "blog-backend")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 未指定子命令时按 serve 处理
    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Create the database tables and exit
    Migrate,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Run the schema migration before accepting requests
    #[arg(long, env = "AUTO_MIGRATE")]
    pub migrate: bool,
}
