//! Command-line front end for the contacts core.
//!
//! # Responsibility
//! - Map one command line onto one session intent.
//! - Keep presentation (plain text lines) out of the core.

use clap::{Parser, Subcommand};
use contacts_core::db::open_db;
use contacts_core::{
    default_log_level, init_logging, Contact, ContactStore, ContactsSession, CreateContactDto,
    SqliteStorage, StoreOptions, SubmitOutcome, UpdateContactDto,
};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "contacts.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "contacts", version, about = "Manage a local contact list")]
struct Cli {
    /// SQLite file holding the contact list.
    #[arg(long, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a contact.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Print all contacts in insertion order.
    List,
    /// Print contacts whose name, email or phone contains TERM.
    Search { term: String },
    /// Overwrite the given fields of one contact.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete one contact.
    Delete { id: String },
    /// Delete every contact.
    Clear,
    /// Print the number of contacts.
    Count,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => Some(conn),
        Err(err) => {
            // Same policy as a missing storage adapter: keep working in memory.
            warn!("event=cli_storage module=cli status=unavailable error={err}");
            eprintln!("storage unavailable ({err}); changes will not be saved");
            None
        }
    };
    let store = ContactStore::open(conn.as_ref().map(SqliteStorage::new), StoreOptions::default());
    let mut session = ContactsSession::new(store);

    let code = run(&mut session, cli.command);
    // The logger buffers writes; flush before the process exits.
    log::logger().flush();
    code
}

fn run(session: &mut ContactsSession<SqliteStorage<'_>>, command: Command) -> ExitCode {
    match command {
        Command::Add { name, email, phone } => {
            match session.submit(CreateContactDto::new(name, email, phone)) {
                Ok(SubmitOutcome::Created(contact)) => {
                    println!("added {}", display_contact(&contact));
                    ExitCode::SUCCESS
                }
                Ok(other) => {
                    eprintln!("unexpected outcome: {other:?}");
                    ExitCode::FAILURE
                }
                Err(err) => {
                    eprintln!("invalid contact: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::List => {
            print_contacts(session.visible_contacts(), &session.empty_message());
            ExitCode::SUCCESS
        }
        Command::Search { term } => {
            session.set_search_term(term);
            print_contacts(session.visible_contacts(), &session.empty_message());
            ExitCode::SUCCESS
        }
        Command::Update {
            id,
            name,
            email,
            phone,
        } => {
            let patch = UpdateContactDto { name, email, phone };
            match session.patch(&id, patch) {
                Ok(Some(contact)) => {
                    println!("updated {}", display_contact(&contact));
                    ExitCode::SUCCESS
                }
                Ok(None) => {
                    eprintln!("contact not found: {id}");
                    ExitCode::FAILURE
                }
                Err(err) => {
                    eprintln!("invalid contact: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Delete { id } => {
            if session.delete(&id) {
                println!("deleted {id}");
                ExitCode::SUCCESS
            } else {
                eprintln!("contact not found: {id}");
                ExitCode::FAILURE
            }
        }
        Command::Clear => {
            session.clear_all();
            println!("all contacts deleted");
            ExitCode::SUCCESS
        }
        Command::Count => {
            println!("{}", session.store().count());
            ExitCode::SUCCESS
        }
    }
}

fn print_contacts(contacts: Vec<&Contact>, empty_message: &str) {
    if contacts.is_empty() {
        println!("{empty_message}");
        return;
    }
    for contact in contacts {
        println!("{}", display_contact(contact));
    }
}

fn display_contact(contact: &Contact) -> String {
    format!(
        "{}  {} <{}> {}  (created {})",
        contact.id,
        contact.name,
        contact.email,
        contact.phone,
        contact.created_at.to_rfc3339()
    )
}
