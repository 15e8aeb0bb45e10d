//! These structs provide the CLI interface for the fin CLI.

use crate::engine::{Filters, Selection};
use crate::model::{Amount, MonthKey, NewTransaction, TransactionEdit, TransactionId, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fin: A command-line tool for tracking personal income and expenses.
///
/// Transactions are kept in a local data directory. You can add, edit and delete them, filter them
/// by type, month and category, look at dashboard statistics and per-category or per-month
/// breakdowns, and move data in and out with CSV export and JSON import.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// The data directory is --fin-home, which defaults to $HOME/fin. Running this again on an
    /// existing directory leaves its data alone.
    Init,
    /// Record a new income or expense.
    Add(AddArgs),
    /// Change some of the fields of an existing transaction.
    Edit(EditArgs),
    /// Delete one transaction.
    Delete(DeleteArgs),
    /// Delete all transactions.
    Clear(ClearArgs),
    /// List transactions, newest first.
    List(FilterArgs),
    /// Show totals, this month compared to last month, recurring totals and the savings rate.
    Summary,
    /// List the months that have transactions, newest first.
    Months,
    /// Show how income or expenses are distributed over categories.
    Categories(CategoriesArgs),
    /// Show income, expenses and net for each month.
    Monthly(FilterArgs),
    /// Write the selected transactions to a CSV file.
    Export(ExportArgs),
    /// Add the transactions from a JSON file in front of the existing ones.
    Import(ImportArgs),
    /// Show or change the dark mode setting.
    Theme(ThemeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The directory where fin data and configuration is held. Defaults to ~/fin
    #[arg(long, env = "FIN_HOME", default_value_t = default_fin_home())]
    fin_home: DisplayPath,

    /// Print the command output as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Common {
    pub fn new(log_level: LevelFilter, fin_home: PathBuf, json: bool) -> Self {
        Self {
            log_level,
            fin_home: fin_home.into(),
            json,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fin_home(&self) -> &DisplayPath {
        &self.fin_home
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Args for the `fin add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// income or expense
    #[arg(long = "type", value_name = "TYPE")]
    transaction_type: TransactionType,

    /// The amount, greater than zero, e.g. 12.50
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// The category key, e.g. food or salary. Defaults to the first category of the type.
    #[arg(long)]
    category: Option<String>,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    note: Option<String>,

    /// Mark the transaction as recurring.
    #[arg(long)]
    recurring: bool,
}

impl AddArgs {
    pub fn new(transaction_type: TransactionType, amount: Amount) -> Self {
        Self {
            transaction_type,
            amount,
            category: None,
            date: None,
            note: None,
            recurring: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Fills in `today` when no date was given.
    pub fn to_new_transaction(&self, today: NaiveDate) -> NewTransaction {
        NewTransaction {
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category.clone(),
            date: self.date.unwrap_or(today),
            note: self.note.clone(),
            recurring: self.recurring,
        }
    }
}

/// Args for the `fin edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the transaction to change.
    id: TransactionId,

    #[arg(long = "type", value_name = "TYPE")]
    transaction_type: Option<TransactionType>,

    #[arg(long, allow_hyphen_values = true)]
    amount: Option<Amount>,

    #[arg(long)]
    category: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,

    /// The new note. An empty string removes the note.
    #[arg(long)]
    note: Option<String>,

    /// true or false
    #[arg(long)]
    recurring: Option<bool>,
}

impl EditArgs {
    pub fn new(id: TransactionId, edit: TransactionEdit) -> Self {
        Self {
            id,
            transaction_type: edit.transaction_type,
            amount: edit.amount,
            category: edit.category,
            date: edit.date,
            note: edit.note,
            recurring: edit.recurring,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn edit(&self) -> TransactionEdit {
        TransactionEdit {
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category.clone(),
            date: self.date,
            note: self.note.clone(),
            recurring: self.recurring,
        }
    }
}

/// Args for the `fin delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    id: TransactionId,

    /// Do not ask for confirmation.
    #[arg(long)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(id: TransactionId, yes: bool) -> Self {
        Self { id, yes }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `fin clear` command.
#[derive(Debug, Parser, Clone)]
pub struct ClearArgs {
    /// Do not ask for confirmation.
    #[arg(long)]
    yes: bool,
}

impl ClearArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// The type, month and category selections. Each one is `all` unless given.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// income, expense or all
    #[arg(long = "type", value_name = "TYPE", default_value = "all")]
    transaction_type: Selection<TransactionType>,

    /// YYYY-MM or all
    #[arg(long, default_value = "all")]
    month: Selection<MonthKey>,

    /// A category key or all
    #[arg(long, default_value = "all")]
    category: Selection<String>,
}

impl FilterArgs {
    pub fn new(
        transaction_type: Selection<TransactionType>,
        month: Selection<MonthKey>,
        category: Selection<String>,
    ) -> Self {
        Self {
            transaction_type,
            month,
            category,
        }
    }

    pub fn filters(&self) -> Filters {
        Filters::new(
            self.transaction_type.clone(),
            self.month.clone(),
            self.category.clone(),
        )
    }
}

/// Args for the `fin categories` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoriesArgs {
    /// income or expense
    #[arg(long = "type", value_name = "TYPE", default_value = "expense")]
    transaction_type: TransactionType,

    /// YYYY-MM or all
    #[arg(long, default_value = "all")]
    month: Selection<MonthKey>,
}

impl CategoriesArgs {
    pub fn new(transaction_type: TransactionType, month: Selection<MonthKey>) -> Self {
        Self {
            transaction_type,
            month,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn month(&self) -> &Selection<MonthKey> {
        &self.month
    }
}

/// Args for the `fin export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    filters: FilterArgs,

    /// Where to write the CSV. Defaults to finance-export-YYYY-MM-DD.csv in the export directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(filters: FilterArgs, out: Option<PathBuf>) -> Self {
        Self { filters, out }
    }

    pub fn filters(&self) -> Filters {
        self.filters.filters()
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// Args for the `fin import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// A JSON file holding an array of transactions.
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeAction {
    Dark,
    Light,
    Toggle,
}

serde_plain::derive_display_from_serialize!(ThemeAction);
serde_plain::derive_fromstr_from_deserialize!(ThemeAction);

/// Args for the `fin theme` command.
#[derive(Debug, Parser, Clone)]
pub struct ThemeArgs {
    /// dark, light or toggle. Shows the current setting when omitted.
    action: Option<ThemeAction>,
}

impl ThemeArgs {
    pub fn new(action: Option<ThemeAction>) -> Self {
        Self { action }
    }

    pub fn action(&self) -> Option<ThemeAction> {
        self.action
    }
}

fn default_fin_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fin"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --fin-home or FIN_HOME instead of relying on the default \
                fin home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("fin")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("fin").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "--fin-home",
            "/tmp/fin",
            "add",
            "--type",
            "expense",
            "--amount",
            "12.50",
            "--category",
            "food",
            "--recurring",
        ]);
        assert_eq!(args.common().fin_home().path(), Path::new("/tmp/fin"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        let today = parse_date("2024-03-05").unwrap();
        let new = add.to_new_transaction(today);
        assert_eq!(new.transaction_type, TransactionType::Expense);
        assert_eq!(new.amount, Amount::from_str("12.5").unwrap());
        assert_eq!(new.category.as_deref(), Some("food"));
        assert_eq!(new.date, today);
        assert!(new.recurring);
    }

    #[test]
    fn test_parse_add_negative_amount_reaches_validation() {
        let args = parse(&["add", "--type", "income", "--amount", "-5"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert!(add.amount.is_negative());
    }

    #[test]
    fn test_parse_edit() {
        let args = parse(&["edit", "1700000000000", "--note", "", "--recurring", "false"]);
        let Command::Edit(edit) = args.command() else {
            panic!("expected edit");
        };
        assert_eq!(edit.id(), &TransactionId::Number(1_700_000_000_000));
        let changes = edit.edit();
        assert_eq!(changes.note.as_deref(), Some(""));
        assert_eq!(changes.recurring, Some(false));
        assert_eq!(changes.amount, None);
    }

    #[test]
    fn test_parse_filters() {
        let args = parse(&["list", "--type", "expense", "--month", "2024-02"]);
        let Command::List(filter_args) = args.command() else {
            panic!("expected list");
        };
        let filters = filter_args.filters();
        assert_eq!(
            filters.transaction_type(),
            &Selection::Only(TransactionType::Expense)
        );
        assert_eq!(filters.month().to_string(), "2024-02");
        assert!(filters.category().is_all());
    }

    #[test]
    fn test_parse_filters_default_to_all() {
        let args = parse(&["monthly"]);
        let Command::Monthly(filter_args) = args.command() else {
            panic!("expected monthly");
        };
        assert!(filter_args.filters().is_cleared());
    }

    #[test]
    fn test_parse_bad_month() {
        let result = Args::try_parse_from(["fin", "list", "--month", "2024-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_theme() {
        let args = parse(&["--json", "theme", "toggle"]);
        assert!(args.common().json());
        let Command::Theme(theme) = args.command() else {
            panic!("expected theme");
        };
        assert_eq!(theme.action(), Some(ThemeAction::Toggle));
    }
}
