use std::path::PathBuf;
use std::process;

use anyhow::{bail, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use vitta::auth::Session;
use vitta::commands::{self, accounts::AccountForm, transactions::TransactionForm};
use vitta::logging::setup_logging;
use vitta::models::{AccountPatch, GroupPatch, PayeeRules};
use vitta::utils::{format_currency, format_date};
use vitta::{AppState, Settings};

/// Command-line client for a Vitta budgeting server.
#[derive(Parser, Debug)]
#[command(name = "vitta", version, about)]
struct Cli {
    /// Base URL of the API, e.g. http://localhost:3000/v1
    #[arg(long, env = "VITTA_BASE_URL", global = true)]
    base_url: Option<String>,

    #[arg(long, env = "VITTA_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "VITTA_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with the configured credentials.
    Login { user: String, secret: String },
    /// Forget the current sign-in.
    Logout,
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// List supported bank formats.
    Adapters,
    /// Work with one account's transactions.
    Transactions {
        /// Account id
        #[arg(long)]
        account: Uuid,
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Manage payees and their matching rules.
    Payees {
        #[command(subcommand)]
        command: PayeesCommands,
    },
    /// Manage category groups.
    Groups {
        #[command(subcommand)]
        command: GroupsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Monthly budgets.
    Budgets {
        #[command(subcommand)]
        command: BudgetsCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AccountsCommands {
    List,
    /// Show one account with its current balance.
    Show { id: Uuid },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        adapter: String,
        #[arg(long)]
        off_budget: bool,
    },
    Rename { id: Uuid, name: String },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum TransactionsCommands {
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        credit: String,
        #[arg(long, default_value = "0")]
        debit: String,
        #[arg(long)]
        payee: Option<Uuid>,
        #[arg(long)]
        category: Option<Uuid>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Import a CSV or Excel bank export.
    Import { file: PathBuf },
    /// Toggle the cleared flag.
    Clear { id: Uuid },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum PayeesCommands {
    List,
    Add {
        name: String,
        #[arg(long)]
        category: Option<Uuid>,
    },
    Rename { id: Uuid, name: String },
    /// Set the category applied to matched transactions. Omit `--category` to unset it.
    Category {
        id: Uuid,
        #[arg(long)]
        category: Option<Uuid>,
    },
    /// Replace the name patterns used to match transactions.
    Rules {
        id: Uuid,
        #[arg(long)]
        includes: Vec<String>,
        #[arg(long)]
        excludes: Vec<String>,
        #[arg(long)]
        starts_with: Vec<String>,
        #[arg(long)]
        ends_with: Vec<String>,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum GroupsCommands {
    List,
    Add {
        name: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum CategoriesCommands {
    List,
    Add {
        name: String,
        #[arg(long)]
        group: Uuid,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum BudgetsCommands {
    Show {
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        month: Option<u8>,
    },
    Set {
        category: Uuid,
        amount: String,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        month: Option<u8>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::from_lookup(|key| match key {
        "VITTA_BASE_URL" => cli.base_url.clone(),
        "VITTA_USERNAME" => cli.username.clone(),
        "VITTA_PASSWORD" => cli.password.clone(),
        _ => std::env::var(key).ok(),
    })
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    setup_logging(&settings.log_level);

    let session = Session::new(&settings);
    match &cli.command {
        Commands::Login { user, secret } => {
            session.login(user, secret)?;
            println!("Logged in.");
            return Ok(());
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
            return Ok(());
        }
        _ if !session.is_authenticated() => bail!("not logged in, run `vitta login` first"),
        _ => {}
    }

    let state = AppState::init(&settings)?;
    let result = dispatch(&state, cli.command).await;
    state.dispose();
    result
}

async fn dispatch(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login { .. } | Commands::Logout => Ok(()),
        Commands::Accounts { command } => accounts(state, command).await,
        Commands::Adapters => {
            state.adapters.get().await?;
            for adapter in state.adapters.items() {
                println!("{:<20} {}", adapter.name, adapter.category);
            }
            Ok(())
        }
        Commands::Transactions { account, command } => transactions(state, account, command).await,
        Commands::Payees { command } => payees(state, command).await,
        Commands::Groups { command } => groups(state, command).await,
        Commands::Categories { command } => categories(state, command).await,
        Commands::Budgets { command } => budgets(state, command).await,
    }
}

async fn accounts(state: &AppState, command: AccountsCommands) -> Result<()> {
    state.accounts.get().await?;
    match command {
        AccountsCommands::List => {
            for account in state.accounts.items() {
                let flag = if account.off_budget { " (off budget)" } else { "" };
                println!(
                    "{}  {:<24} {:<12} {:>14}{}",
                    account.id,
                    account.name,
                    account.category,
                    format_currency(account.balance),
                    flag
                );
            }
        }
        AccountsCommands::Show { id } => {
            let account = state.accounts.refresh_one(id).await?;
            println!("{} ({}, {})", account.name, account.category, account.adapter);
            println!("Balance: {}", format_currency(account.balance));
        }
        AccountsCommands::Add {
            name,
            category,
            adapter,
            off_budget,
        } => {
            let form = AccountForm {
                name,
                category,
                adapter,
                off_budget,
            };
            let account = commands::accounts::create_account(state, form).await?;
            println!("Created account {}", account.id);
        }
        AccountsCommands::Rename { id, name } => {
            let patch = AccountPatch {
                name: Some(name),
                ..Default::default()
            };
            match commands::accounts::update_account(state, id, patch).await? {
                Some(_) => println!("Account renamed."),
                None => println!("Nothing to change."),
            }
        }
        AccountsCommands::Delete { id } => {
            commands::accounts::delete_account(state, id).await?;
            println!("Deleted account {}", id);
        }
    }
    Ok(())
}

async fn transactions(state: &AppState, account: Uuid, command: TransactionsCommands) -> Result<()> {
    match command {
        TransactionsCommands::List { page, search } => {
            if let Some(search) = search {
                state.transactions.set_search_query(&search)?;
            }
            state.transactions.get(account).await?;
            while state.transactions.pagination().map(|p| p.page()).unwrap_or(1) < page {
                if !commands::transactions::next_page(state).await? {
                    break;
                }
            }
            print_transactions(state)?;
        }
        TransactionsCommands::Add {
            name,
            credit,
            debit,
            payee,
            category,
            notes,
        } => {
            state.transactions.get(account).await?;
            let form = TransactionForm {
                name,
                payee_id: payee,
                category_id: category,
                credit,
                debit,
                notes,
            };
            let transaction = commands::transactions::add_transaction(state, form).await?;
            println!("Created transaction {}", transaction.id);
        }
        TransactionsCommands::Import { file } => {
            state.accounts.get().await?;
            state.transactions.get(account).await?;
            let result = commands::transactions::import_file(state, &file).await?;
            println!("Imported {} of {} rows.", result.imported_count, result.total);
        }
        TransactionsCommands::Clear { id } => {
            state.transactions.get(account).await?;
            commands::transactions::toggle_cleared(state, id).await?;
            let cleared = state.transactions.find(id).map(|t| t.is_cleared()).unwrap_or(false);
            println!("{} is now {}", id, if cleared { "cleared" } else { "uncleared" });
        }
        TransactionsCommands::Delete { id } => {
            state.transactions.get(account).await?;
            commands::transactions::delete_transaction(state, id).await?;
            println!("Deleted transaction {}", id);
        }
    }
    Ok(())
}

fn print_transactions(state: &AppState) -> Result<()> {
    let snapshot = state.transactions.snapshot()?;
    for transaction in &snapshot.items {
        let amount = transaction.credit - transaction.debit;
        println!(
            "{}  {:<11} {:<32} {:>12}  {}",
            transaction.id,
            format_date(transaction.cleared_at),
            transaction.name,
            format_currency(Some(amount)),
            transaction.category_name.as_deref().unwrap_or("")
        );
    }
    println!(
        "Page {} of {} ({} transactions)",
        snapshot.page,
        snapshot.total_pages.max(1),
        snapshot.total
    );
    Ok(())
}

async fn payees(state: &AppState, command: PayeesCommands) -> Result<()> {
    state.payees.get().await?;
    match command {
        PayeesCommands::List => {
            for payee in state.payees.items() {
                let rules = payee.rules.as_ref().filter(|rules| !rules.is_empty());
                println!("{}  {}{}", payee.id, payee.name, if rules.is_some() { " *" } else { "" });
            }
        }
        PayeesCommands::Add { name, category } => {
            let payee = commands::payees::create_payee(state, &name, category).await?;
            println!("Created payee {}", payee.id);
        }
        PayeesCommands::Rename { id, name } => {
            commands::payees::rename_payee(state, id, &name).await?;
            println!("Payee renamed.");
        }
        PayeesCommands::Category { id, category } => {
            commands::payees::set_auto_category(state, id, category).await?;
            println!("Auto-category updated.");
        }
        PayeesCommands::Rules {
            id,
            includes,
            excludes,
            starts_with,
            ends_with,
        } => {
            let rules = PayeeRules {
                includes,
                excludes,
                starts_with,
                ends_with,
            };
            commands::payees::set_payee_rules(state, id, rules).await?;
            println!("Rules updated.");
        }
        PayeesCommands::Delete { id } => {
            commands::payees::delete_payee(state, id).await?;
            println!("Deleted payee {}", id);
        }
    }
    Ok(())
}

async fn groups(state: &AppState, command: GroupsCommands) -> Result<()> {
    state.groups.get().await?;
    match command {
        GroupsCommands::List => {
            for group in state.groups.items() {
                println!("{}  {}", group.id, group.name);
            }
        }
        GroupsCommands::Add { name, notes } => {
            let group = commands::budgets::create_group(state, &name, notes.as_deref()).await?;
            println!("Created group {}", group.id);
        }
        GroupsCommands::Edit { id, name, notes } => {
            let patch = GroupPatch { name, notes };
            commands::budgets::update_group(state, id, patch).await?;
            println!("Group updated.");
        }
        GroupsCommands::Delete { id } => {
            commands::budgets::delete_group(state, id).await?;
            println!("Deleted group {}", id);
        }
    }
    Ok(())
}

async fn categories(state: &AppState, command: CategoriesCommands) -> Result<()> {
    state.categories.get().await?;
    match command {
        CategoriesCommands::List => {
            state.groups.get().await?;
            for group in state.groups.items() {
                println!("{}", group.name);
                for category in state.categories.items().iter().filter(|c| c.group_id == group.id) {
                    println!("  {}  {}", category.id, category.name);
                }
            }
        }
        CategoriesCommands::Add { name, group, notes } => {
            let category = commands::budgets::create_category(state, group, &name, notes.as_deref()).await?;
            println!("Created category {}", category.id);
        }
        CategoriesCommands::Delete { id } => {
            commands::budgets::delete_category(state, id).await?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}

fn period(year: Option<u16>, month: Option<u8>) -> (u16, u8) {
    let today = Utc::now();
    (
        year.unwrap_or(today.year() as u16),
        month.unwrap_or(today.month() as u8),
    )
}

async fn budgets(state: &AppState, command: BudgetsCommands) -> Result<()> {
    match command {
        BudgetsCommands::Show { year, month } => {
            let (year, month) = period(year, month);
            state.budgets.get_by_period(year, month).await?;
            for group in state.budgets.grouped() {
                println!(
                    "{:<30} {:>14} {:>14}",
                    group.group_name,
                    format_currency(Some(group.budgeted)),
                    format_currency(Some(group.spent))
                );
                for row in &group.rows {
                    println!(
                        "  {:<28} {:>14} {:>14}",
                        row.category_name.as_deref().unwrap_or("-"),
                        format_currency(Some(row.budgeted)),
                        format_currency(Some(row.spent))
                    );
                }
            }
        }
        BudgetsCommands::Set {
            category,
            amount,
            year,
            month,
        } => {
            let (year, month) = period(year, month);
            let budget = commands::budgets::set_budget(state, category, year, month, &amount).await?;
            println!(
                "Budgeted {} for {}-{:02}",
                format_currency(Some(budget.budgeted)),
                budget.year,
                budget.month
            );
        }
    }
    Ok(())
}
