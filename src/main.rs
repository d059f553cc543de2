//! deal-pipeline - command-line client for the deal pipeline API

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use deal_pipeline::{
    AppContext, ApiMetrics, ClientConfig, Deal, DealDetailScreen, DealDimension, DealFormScreen,
    DealListScreen, DealStage, ListView, LoginScreen, NewUser, PipelineError, Role, Router, User,
    UserDimension, UserFormScreen, UserManagementScreen, group_by_stage, handlers::deal_columns,
    logout, services::Queryable,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// deal-pipeline - track deals through the pipeline
#[derive(Parser, Debug)]
#[command(name = "deal-pipeline")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the API (overrides PIPELINE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print request metrics in Prometheus text format to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session
    Login { username: String, password: String },

    /// Clear the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Print version and build information
    Version,

    /// Deal commands
    #[command(subcommand)]
    Deals(DealCommands),

    /// User management (ADMIN only)
    #[command(subcommand)]
    Users(UserCommands),
}

#[derive(Subcommand, Debug)]
enum DealCommands {
    /// List deals with optional search, filters and paging
    #[command(alias = "ls")]
    List(DealListArgs),

    /// Show deals grouped by stage
    Board,

    /// Show one deal with its notes
    Show { id: String },

    /// Create a deal
    Create(DealFieldArgs),

    /// Edit a deal's basic fields
    Edit {
        id: String,
        #[command(flatten)]
        fields: DealEditArgs,
    },

    /// Move a deal to another stage
    Stage { id: String, stage: DealStage },

    /// Append a note to a deal
    Note { id: String, text: String },

    /// Set a deal's value (ADMIN only)
    Value { id: String, value: i64 },

    /// Delete a deal (ADMIN only)
    Delete { id: String },
}

#[derive(Args, Debug)]
struct DealListArgs {
    /// Case-insensitive search over client, sector, type and summary
    #[arg(short, long, default_value = "")]
    search: String,
    #[arg(long, default_value = "ALL")]
    sector: String,
    #[arg(long, default_value = "ALL")]
    stage: String,
    #[arg(long = "type", default_value = "ALL")]
    deal_type: String,
    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    page: usize,
}

#[derive(Args, Debug)]
struct DealFieldArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    sector: String,
    #[arg(long = "type")]
    deal_type: String,
    #[arg(long, default_value = "")]
    summary: String,
    /// Ignored unless the session is ADMIN
    #[arg(long, allow_negative_numbers = true)]
    value: Option<i64>,
}

#[derive(Args, Debug)]
struct DealEditArgs {
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    sector: Option<String>,
    #[arg(long = "type")]
    deal_type: Option<String>,
    #[arg(long)]
    summary: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    value: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// List users with optional search, filters and paging
    #[command(alias = "ls")]
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, default_value = "ALL")]
        role: String,
        /// ACTIVE, INACTIVE or ALL
        #[arg(long, default_value = "ALL")]
        status: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Create a user
    Create {
        username: String,
        email: String,
        password: String,
        #[arg(long, default_value = "USER")]
        role: Role,
    },

    /// Activate or deactivate a user
    Toggle { id: String },
}

fn init_tracing() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "deal_pipeline=info,session_audit=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        print_version();
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.api = config.api.with_base_url(url);
    }
    debug!(api = %config.api.base_url, session = %config.session.storage_path.display(), "starting");

    let router = Arc::new(Router::new());
    let metrics = if cli.metrics {
        Some(ApiMetrics::new().context("Failed to create metrics")?)
    } else {
        None
    };
    let ctx = AppContext::from_config(config, router, metrics.clone())
        .context("Failed to initialise client")?;

    let result = run(cli.command, &ctx).await;
    if let Some(metrics) = &metrics {
        match metrics.render() {
            Ok(text) => eprint!("{text}"),
            Err(e) => warn!(error = %e, "failed to render metrics"),
        }
    }

    match result {
        Ok(()) => Ok(()),
        Err(e @ PipelineError::AuthenticationAbsent) => {
            eprintln!("Error: {e}. Run `deal-pipeline login` first.");
            std::process::exit(2);
        }
        // Admin-only actions are refused without navigating, so no redirect is reported
        Err(e @ PipelineError::AuthorizationDenied { .. }) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
        Err(PipelineError::RequestFailed(e)) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_version() {
    println!("deal-pipeline {}", env!("CARGO_PKG_VERSION"));
    if let Some(sha) = option_env!("VERGEN_GIT_SHA") {
        println!("commit: {sha}");
    }
    if let Some(built) = option_env!("VERGEN_BUILD_TIMESTAMP") {
        println!("built: {built}");
    }
}

async fn run(command: Commands, ctx: &AppContext) -> Result<(), PipelineError> {
    match command {
        Commands::Login { username, password } => {
            let mut screen = LoginScreen::open(ctx.clone())?;
            match screen.submit(&username, &password).await {
                Ok(role) => {
                    println!("Logged in as {username} ({role})");
                    Ok(())
                }
                Err(e) => {
                    if let Some(message) = screen.error() {
                        eprintln!("{message}");
                        std::process::exit(1);
                    }
                    Err(e)
                }
            }
        }
        Commands::Logout => {
            logout(ctx)?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => {
            ctx.enter(deal_pipeline::Screen::DealList)?;
            let user = ctx.auth().current_user().await?;
            println!("{} <{}> {} {}", user.username, user.email, user.role, user.status().as_str());
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Deals(command) => run_deals(command, ctx).await,
        Commands::Users(command) => run_users(command, ctx).await,
    }
}

async fn run_deals(command: DealCommands, ctx: &AppContext) -> Result<(), PipelineError> {
    match command {
        DealCommands::List(args) => {
            let mut screen = DealListScreen::open(ctx.clone())?;
            screen.reload().await;
            let role = screen.role();
            let view = screen.view_mut();
            view.set_search_term(args.search);
            view.set_filter(DealDimension::Sector, args.sector.as_str());
            view.set_filter(DealDimension::Stage, args.stage.as_str());
            view.set_filter(DealDimension::DealType, args.deal_type.as_str());
            view.go_to_page(args.page);

            println!("{}", deal_columns(role).join("\t"));
            for deal in view.page() {
                println!("{}", deal_row(deal, role));
            }
            print_page_footer(view);
            Ok(())
        }
        DealCommands::Board => {
            let mut screen = DealListScreen::open(ctx.clone())?;
            screen.reload().await;
            for column in group_by_stage(screen.view().items()) {
                println!("== {} ({})", column.stage.label(), column.deals.len());
                for deal in column.deals {
                    println!("  {}  {}", deal.id, deal.client_name);
                }
            }
            Ok(())
        }
        DealCommands::Show { id } => {
            let mut screen = DealDetailScreen::open(ctx.clone(), id)?;
            let admin = screen.is_admin();
            let deal = screen.load().await?;
            print_deal(deal, admin);
            Ok(())
        }
        DealCommands::Create(args) => {
            let mut screen = DealFormScreen::open_new(ctx.clone())?;
            screen.draft.client_name = args.client;
            screen.draft.sector = args.sector;
            screen.draft.deal_type = args.deal_type;
            screen.draft.summary = args.summary;
            screen.draft.deal_value = args.value;
            let deal = screen.submit().await?;
            println!("Created deal {}", deal.id);
            Ok(())
        }
        DealCommands::Edit { id, fields } => {
            let mut screen = DealFormScreen::open_edit(ctx.clone(), id).await?;
            let draft = &mut screen.draft;
            if let Some(client) = fields.client {
                draft.client_name = client;
            }
            if let Some(sector) = fields.sector {
                draft.sector = sector;
            }
            if let Some(deal_type) = fields.deal_type {
                draft.deal_type = deal_type;
            }
            if let Some(summary) = fields.summary {
                draft.summary = summary;
            }
            if fields.value.is_some() {
                draft.deal_value = fields.value;
            }
            let deal = screen.submit().await?;
            println!("Updated deal {}", deal.id);
            Ok(())
        }
        DealCommands::Stage { id, stage } => {
            let mut screen = DealDetailScreen::open(ctx.clone(), id)?;
            screen.load().await?;
            let deal = screen.change_stage(stage).await?;
            println!("{} is now {}", deal.id, deal.current_stage.label());
            Ok(())
        }
        DealCommands::Note { id, text } => {
            let mut screen = DealDetailScreen::open(ctx.clone(), id)?;
            screen.load().await?;
            if screen.add_note(&text).await? {
                println!("Note added");
            } else {
                println!("Empty note ignored");
            }
            Ok(())
        }
        DealCommands::Value { id, value } => {
            let mut screen = DealDetailScreen::open(ctx.clone(), id)?;
            let deal = screen.update_value(value).await?;
            println!("{} value set to {}", deal.id, value);
            Ok(())
        }
        DealCommands::Delete { id } => {
            let mut screen = DealListScreen::open(ctx.clone())?;
            screen.delete(&id).await?;
            println!("Deleted deal {id}");
            Ok(())
        }
    }
}

async fn run_users(command: UserCommands, ctx: &AppContext) -> Result<(), PipelineError> {
    match command {
        UserCommands::List {
            search,
            role,
            status,
            page,
        } => {
            let mut screen = UserManagementScreen::open(ctx.clone())?;
            screen.reload().await;
            let view = screen.view_mut();
            view.set_search_term(search);
            view.set_filter(UserDimension::Role, role.as_str());
            view.set_filter(UserDimension::Status, status.as_str());
            view.go_to_page(page);

            for user in view.page() {
                println!("{}", user_row(user));
            }
            print_page_footer(view);
            Ok(())
        }
        UserCommands::Create {
            username,
            email,
            password,
            role,
        } => {
            let screen = UserFormScreen::open(ctx.clone())?;
            let user = NewUser::new(username, email, password).with_role(role);
            screen.submit(&user).await?;
            println!("Created user {}", user.username);
            Ok(())
        }
        UserCommands::Toggle { id } => {
            let mut screen = UserManagementScreen::open(ctx.clone())?;
            screen.reload().await;
            match screen.toggle(&id).await? {
                Some(_) => println!("Toggled user {id}"),
                None => eprintln!("No user with id {id}"),
            }
            Ok(())
        }
    }
}

fn deal_row(deal: &Deal, role: Role) -> String {
    let mut cells = vec![
        deal.client_name.clone(),
        deal.sector.clone(),
        deal.deal_type.clone(),
    ];
    if role.is_admin() {
        cells.push(
            deal.visible_value(role)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    cells.push(deal.current_stage.label().to_string());
    if role.is_admin() {
        cells.push(deal.id.clone());
    }
    cells.join("\t")
}

fn user_row(user: &User) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        user.id,
        user.username,
        user.email,
        user.role,
        user.status().as_str()
    )
}

fn print_deal(deal: &Deal, admin: bool) {
    println!("{} ({})", deal.client_name, deal.id);
    println!("  sector: {}", deal.sector);
    println!("  type:   {}", deal.deal_type);
    println!("  stage:  {}", deal.current_stage.label());
    if admin {
        match deal.deal_value {
            Some(value) => println!("  value:  {value}"),
            None => println!("  value:  -"),
        }
    }
    if let Some(summary) = &deal.summary {
        println!("  summary: {summary}");
    }
    for note in deal.notes() {
        println!("  [{}] {}: {}", note.timestamp.to_rfc3339(), note.user_id, note.note);
    }
}

fn print_page_footer<T: Queryable>(view: &ListView<T>) {
    let info = view.page_info();
    if info.total_count == 0 {
        println!("No results");
    } else {
        println!(
            "Showing {}-{} of {} (page {}/{})",
            info.start_index, info.end_index, info.total_count, info.current_page, info.total_pages
        );
    }
}
