use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crm", about = "Orders and clients for a small web studio", version)]
pub struct Cli {
    /// SQLite database file (overrides CRM_DB_PATH; default: in-memory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides CRM_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides CRM_LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List, create, move or delete orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// List, create or delete clients
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },
    /// Print a collection as a JSON array
    Export(ExportArgs),
    /// Replace a collection with the contents of a JSON file
    Import(ImportArgs),
    /// Dashboard figures: orders per status and completed revenue
    Stats,
    /// List the service catalog with default prices
    Services,
}

#[derive(Subcommand, Debug)]
pub enum OrderAction {
    /// Show orders matching the search term and status
    #[command(alias = "ls")]
    List(OrderListArgs),
    /// Create an order for an existing client
    Add(OrderAddArgs),
    /// Move an order to another status column
    Move { id: String, status: String },
    /// Delete an order and release its client's counter
    Delete { id: String },
    /// Print the number the next order would get
    NextNumber,
}

#[derive(Args, Debug)]
pub struct OrderListArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// `all` or one of new|processing|completed|cancelled
    #[arg(long, default_value = "all")]
    pub status: String,
}

#[derive(Args, Debug)]
pub struct OrderAddArgs {
    #[arg(long, value_name = "CLIENT_ID")]
    pub client: String,
    /// `NAME[*QTY][=PRICE]`; catalog services may omit the price
    #[arg(long = "item", value_name = "ITEM", required = true)]
    pub items: Vec<String>,
    #[arg(long, default_value = "new")]
    pub status: String,
    #[arg(long)]
    pub comments: Option<String>,
    /// Use a random three-digit number instead of the next sequential one
    #[arg(long)]
    pub random_number: bool,
}

#[derive(Subcommand, Debug)]
pub enum ClientAction {
    /// Show clients matching the search term
    #[command(alias = "ls")]
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Create a client
    Add(ClientAddArgs),
    /// Delete a client; its orders are kept
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct ClientAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Orders,
    Clients,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    pub collection: Collection,
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    pub collection: Collection,
    pub file: PathBuf,
}
