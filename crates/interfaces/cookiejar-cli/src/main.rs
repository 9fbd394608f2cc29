use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use cookiejar_cli::{commands, settings, CliContext, CliDeletePolicy};
use cookiejar_core::WatchSpecFields;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Directory for settings.json and cookiejar.redb
    #[arg(long, global = true, env = "COOKIEJAR_DATA_DIR")]
    data_dir: Option<Utf8PathBuf>,
    /// Firefox cookies.sqlite or Netscape cookies.txt to read from
    #[arg(long, global = true)]
    cookies: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current value of every watched cookie (default)
    View,
    /// List watched cookies
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        domain: String,
        #[arg(long, default_value = "")]
        desc: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },
    Delete {
        id: String,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Set {
        #[arg(long, value_enum)]
        delete_policy: Option<CliDeletePolicy>,
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        cookie_source: Option<Utf8PathBuf>,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext::new(cli.data_dir, cli.cookies);

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => {
            commands::cmd_view(&ctx).await?;
        }
        Commands::List => {
            commands::cmd_list(&ctx).await?;
        }
        Commands::Add { name, domain, desc } => {
            commands::cmd_add(&ctx, WatchSpecFields { name, domain, desc }).await?;
        }
        Commands::Edit {
            id,
            name,
            domain,
            desc,
        } => {
            commands::cmd_edit(&ctx, id, name, domain, desc).await?;
        }
        Commands::Delete { id, yes } => {
            commands::cmd_delete(&ctx, id, yes).await?;
        }
        Commands::Settings { command } => match command {
            SettingsCommands::Show => {
                settings::handle_show(&ctx)?;
            }
            SettingsCommands::Set {
                delete_policy,
                timeout_ms,
                cookie_source,
            } => {
                settings::handle_set(&ctx, delete_policy, timeout_ms, cookie_source)?;
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("default subscriber")?;

    if let Err(e) = run(cli).await {
        if !commands::already_presented(&e) {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
    Ok(())
}
