use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{
    AccountRef, Engine, Ledger, NewMasterIncome, NewMasterItem, TransactionKind,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "tally_admin")]
#[command(about = "Admin utilities for the Tally economy ledger")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./tally.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Account(Account),
    Balance(Balance),
    Item(Item),
    Income(Income),
    Grant(Grant),
    /// Wipe all ledger tables.
    Reset(ResetArgs),
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create the account if missing, refresh its display name otherwise.
    Ensure(AccountEnsureArgs),
    /// Print the account row as JSON.
    Show(AccountShowArgs),
}

#[derive(Args, Debug)]
struct AccountEnsureArgs {
    #[arg(long)]
    community: String,
    #[arg(long)]
    member: String,
    #[arg(long)]
    display_name: String,
}

#[derive(Args, Debug)]
struct AccountShowArgs {
    #[arg(long)]
    community: String,
    #[arg(long)]
    member: String,
}

#[derive(Args, Debug)]
struct Balance {
    #[command(subcommand)]
    command: BalanceCommand,
}

#[derive(Subcommand, Debug)]
enum BalanceCommand {
    /// Apply a signed delta to one ledger of an account.
    Apply(BalanceApplyArgs),
}

#[derive(Args, Debug)]
struct BalanceApplyArgs {
    #[arg(long)]
    community: String,
    #[arg(long)]
    member: String,
    /// "cash" or "bank".
    #[arg(long, default_value = "cash")]
    ledger: String,
    /// Signed amount; negative values debit.
    #[arg(long, allow_hyphen_values = true)]
    amount: i64,
    /// Transaction kind: purchase, sale, income, command_reward, daily_claim
    /// or miscellaneous.
    #[arg(long, default_value = "miscellaneous")]
    kind: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    Add(ItemAddArgs),
    List,
}

#[derive(Args, Debug)]
struct ItemAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: i64,
    #[arg(long)]
    one_time: bool,
    #[arg(long)]
    in_inventory: bool,
    #[arg(long)]
    command: Option<String>,
    #[arg(long)]
    linked_income: Option<i64>,
}

#[derive(Args, Debug)]
struct Income {
    #[command(subcommand)]
    command: IncomeCommand,
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    Add(IncomeAddArgs),
    List,
}

#[derive(Args, Debug)]
struct IncomeAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    percent: bool,
    #[arg(long, default_value_t = 0)]
    cooldown_secs: i64,
    #[arg(long)]
    linked_item: Option<i64>,
}

#[derive(Args, Debug)]
struct Grant {
    #[command(subcommand)]
    command: GrantCommand,
}

#[derive(Subcommand, Debug)]
enum GrantCommand {
    /// Grant a master item (and its linked income, if any) to an account.
    Item(GrantArgs),
    /// Grant a master income (and its linked item, if any) to an account.
    Income(GrantArgs),
}

#[derive(Args, Debug)]
struct GrantArgs {
    #[arg(long)]
    community: String,
    #[arg(long)]
    member: String,
    /// Master catalog id to grant.
    #[arg(long)]
    id: i64,
}

#[derive(Args, Debug)]
struct ResetArgs {
    /// Also reset the AUTOINCREMENT counters so ids restart from 1.
    #[arg(long)]
    sequences: bool,
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tally_admin=info,engine=info")),
        )
        .init();

    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Account(Account {
            command: AccountCommand::Ensure(args),
        }) => {
            let id = engine
                .ensure_account(&args.community, &args.member, &args.display_name)
                .await?;
            println!("account id: {id}");
        }
        Command::Account(Account {
            command: AccountCommand::Show(args),
        }) => {
            let account = engine.account(&args.community, &args.member).await?;
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
        Command::Balance(Balance {
            command: BalanceCommand::Apply(args),
        }) => {
            let ledger = Ledger::try_from(args.ledger.as_str())?;
            let kind = TransactionKind::try_from(args.kind.as_str())?;
            let record = engine
                .apply_delta(
                    AccountRef::identity(&args.community, &args.member),
                    ledger,
                    args.amount,
                    kind,
                    &args.description,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Item(Item {
            command: ItemCommand::Add(args),
        }) => {
            let id = engine
                .add_master_item(NewMasterItem {
                    name: args.name,
                    price: args.price,
                    one_time: args.one_time,
                    in_inventory: args.in_inventory,
                    command: args.command,
                    linked_income_id: args.linked_income,
                })
                .await?;
            println!("item id: {id}");
        }
        Command::Item(Item {
            command: ItemCommand::List,
        }) => {
            let items = engine.list_items().await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Income(Income {
            command: IncomeCommand::Add(args),
        }) => {
            let id = engine
                .add_master_income(NewMasterIncome {
                    name: args.name,
                    amount: args.amount,
                    is_percent: args.percent,
                    cooldown_secs: args.cooldown_secs,
                    linked_item_id: args.linked_item,
                })
                .await?;
            println!("income id: {id}");
        }
        Command::Income(Income {
            command: IncomeCommand::List,
        }) => {
            let incomes = engine.list_incomes().await?;
            println!("{}", serde_json::to_string_pretty(&incomes)?);
        }
        Command::Grant(Grant { command }) => match command {
            GrantCommand::Item(args) => {
                let account = engine.account(&args.community, &args.member).await?;
                engine
                    .grant_item(account.id, &account.community_id, args.id)
                    .await?;
                println!("granted item {} to account {}", args.id, account.id);
            }
            GrantCommand::Income(args) => {
                let account = engine.account(&args.community, &args.member).await?;
                engine
                    .grant_income(account.id, &account.community_id, args.id)
                    .await?;
                println!("granted income {} to account {}", args.id, account.id);
            }
        },
        Command::Reset(args) => {
            engine.reset_all_data(args.sequences).await?;
            println!("all ledger tables wiped");
        }
    }

    Ok(())
}
