// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas CLI - Main entry point
//
// Command-line frontend for the Feira offer marketplace API.

mod commands;
mod state;

use clap::{Parser, Subcommand};
use feira_core::{ClientConfig, OfferDraft, OfferPageQuery, Role};
use state::AppState;

#[derive(Parser)]
#[command(name = "feira", version, about = "Client for the Feira offer marketplace")]
struct Cli {
    /// API origin (overrides the FEIRA_API_URL environment variable)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Create a new account
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        /// ADMINISTRADOR, COMERCIANTE or USUARIO
        #[arg(long, default_value = "USUARIO")]
        role: Role,
    },
    /// Show the current user
    Whoami,
    /// User directory
    Usuarios {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Offer listing and management
    Ofertas {
        #[command(subcommand)]
        command: OfferCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// List all users
    List,
    /// Show one user
    Show { id: i64 },
}

#[derive(Subcommand)]
enum OfferCommand {
    /// List public offers
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List your own offers
    Minhas {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one offer
    Show { id: i64 },
    /// Create an offer
    Create {
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Edit a pending offer
    Edit {
        id: i64,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete an offer
    Delete { id: i64 },
    /// Approve a pending offer
    Aprovar { id: i64 },
    /// Reject a pending offer
    Rejeitar {
        id: i64,
        /// Optional rejection reason
        #[arg(long)]
        motivo: Option<String>,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    /// Filter by product name
    #[arg(long)]
    nome: Option<String>,
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
}

impl From<PageArgs> for OfferPageQuery {
    fn from(args: PageArgs) -> Self {
        Self {
            name: args.nome,
            page: args.page,
            size: args.size,
        }
    }
}

#[derive(clap::Args)]
struct DraftArgs {
    /// Product name
    #[arg(long)]
    nome: String,
    /// Price, must be positive
    #[arg(long)]
    preco: f64,
    /// Quantity in stock, zero is allowed
    #[arg(long)]
    quantidade: u32,
    /// Description, up to 1000 characters
    #[arg(long, default_value = "")]
    descricao: String,
}

impl From<DraftArgs> for OfferDraft {
    fn from(args: DraftArgs) -> Self {
        Self {
            product_name: args.nome,
            price: args.preco,
            quantity: args.quantidade,
            description: args.descricao,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feira_cli=info".parse().unwrap())
                .add_directive("feira_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.api_url {
        Some(url) => ClientConfig::with_base_url(url.clone()),
        None => ClientConfig::from_env(),
    };

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Erro ao inicializar o cliente: {}", e);
            std::process::exit(1);
        }
    };

    if run(&state, cli.command).await.is_err() {
        std::process::exit(1);
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), feira_core::AppError> {
    match command {
        Command::Login { email, password } => commands::login(state, email, password).await,
        Command::Logout => commands::logout(state),
        Command::Register {
            name,
            email,
            password,
            role,
        } => commands::register(state, name, email, password, role).await,
        Command::Whoami => commands::whoami(state).await,
        Command::Usuarios { command } => match command {
            UserCommand::List => commands::list_users(state).await,
            UserCommand::Show { id } => commands::show_user(state, id).await,
        },
        Command::Ofertas { command } => match command {
            OfferCommand::List { page } => commands::list_offers(state, page.into()).await,
            OfferCommand::Minhas { page } => commands::my_offers(state, page.into()).await,
            OfferCommand::Show { id } => commands::show_offer(state, id).await,
            OfferCommand::Create { draft } => commands::create_offer(state, draft.into()).await,
            OfferCommand::Edit { id, draft } => {
                commands::update_offer(state, id, draft.into()).await
            }
            OfferCommand::Delete { id } => commands::delete_offer(state, id).await,
            OfferCommand::Aprovar { id } => commands::approve_offer(state, id).await,
            OfferCommand::Rejeitar { id, motivo } => {
                commands::reject_offer(state, id, motivo).await
            }
        },
    }
}
