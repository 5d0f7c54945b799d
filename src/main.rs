use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use boards::auth::{register, RegistrationRequest};
use boards::web::WebServer;
use boards::{BoardService, Config, Database};

#[derive(Parser)]
#[command(name = "boards")]
#[command(about = "Discussion boards web forum")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve,
    /// Create a board
    CreateBoard {
        /// Board name (unique)
        #[arg(long)]
        name: String,
        /// Board description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create a user account
    CreateUser {
        /// Login name
        #[arg(long)]
        username: String,
        /// E-mail address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
}

fn load_config(path: &PathBuf) -> Config {
    match Config::load_with_env(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

async fn run(cli: Cli, config: Config) -> boards::Result<()> {
    let db = Database::open(&config.database.path).await?;

    match cli.command {
        Commands::Serve => {
            config.validate()?;
            info!(
                "Server configured on {}:{}",
                config.server.host, config.server.port
            );
            WebServer::new(config, db)?.run().await
        }
        Commands::CreateBoard { name, description } => {
            let board = BoardService::new(&db)
                .create_board(&name, &description)
                .await?;
            println!("Created board {} (id {})", board.name, board.id);
            Ok(())
        }
        Commands::CreateUser {
            username,
            email,
            password,
        } => {
            let repo = boards::UserRepository::new(db.pool());
            let user = register(&repo, RegistrationRequest::new(username, email, password))
                .await
                .map_err(|e| boards::BoardsError::Validation(e.to_string()))?;
            println!("Created user {} (id {})", user.username, user.id);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    if let Err(e) = boards::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        boards::logging::init_console_only(&config.logging.level);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
