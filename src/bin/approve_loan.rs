use std::{error::Error, path::Path, process::exit};

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use passbook_rs::{Transaction, TransactionId, approve_loan, get_pending_loans, initialize_db};

/// A utility for reviewing and approving loan requests.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the loans waiting for approval.
    List,
    /// Approve a loan and credit it to the borrower's account.
    Approve {
        /// The ID of the loan, as shown by `list`.
        #[arg(long)]
        loan_id: TransactionId,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    match args.command {
        Command::List => list_pending_loans(&connection)?,
        Command::Approve { loan_id } => match approve_loan(loan_id, &connection) {
            Ok(loan) => println!(
                "Approved loan {} for {:.2}$. Account {} balance is now {:.2}$.",
                loan.id, loan.amount, loan.account_id, loan.balance_after_transaction
            ),
            Err(error) => {
                print_error(format!("Could not approve loan {loan_id}: {error}"));
                exit(1);
            }
        },
    }

    Ok(())
}

fn list_pending_loans(connection: &Connection) -> Result<(), Box<dyn Error>> {
    let loans = get_pending_loans(connection)?;

    if loans.is_empty() {
        println!("There are no loans waiting for approval.");
        return Ok(());
    }

    println!("{:>8}  {:>8}  {:>12}  requested", "loan id", "account", "amount");
    for loan in &loans {
        print_loan(loan);
    }

    Ok(())
}

fn print_loan(loan: &Transaction) {
    println!(
        "{:>8}  {:>8}  {:>12.2}  {}",
        loan.id, loan.account_id, loan.amount, loan.timestamp
    );
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string());
}
