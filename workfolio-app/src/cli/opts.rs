use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "workfolio", version, about = "Workfolio portfolio store: CLI and HTTP API")]
pub struct Cli {
    /// Deployment environment; `production` resolves paths from the install root
    #[arg(long = "env", env = "WORKFOLIO_ENV", default_value = "development")]
    pub environment: String,

    /// Base directory for data and uploads (overrides the environment default)
    #[arg(long, env = "WORKFOLIO_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Data directory, relative to the base directory
    #[arg(long, env = "WORKFOLIO_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Uploads directory, relative to the base directory
    #[arg(long, env = "WORKFOLIO_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Launch Axum HTTP API
    Serve(ServeCmd),
    /// Print the resolved data/uploads layout
    Paths,
    /// Work operations (CLI)
    #[command(subcommand)]
    Work(WorkCmd),
    /// Store a local image as an upload and print its reference
    Upload { path: PathBuf },
}

#[derive(Debug, Subcommand, Clone)]
pub enum WorkCmd {
    List,
    Show { id: u64 },
    Add(WorkAdd),
    Edit(WorkEdit),
    Rm { id: u64 },
}

#[derive(Debug, Args, Clone)]
pub struct WorkAdd {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub image_url: String,
    #[arg(long)]
    pub client_url: String,
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Debug, Args, Clone)]
pub struct WorkEdit {
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub client_url: Option<String>,
    #[arg(long)]
    pub visible: bool,
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ServeCmd {
    /// Bind address (host:port)
    #[arg(long, env = "WORKFOLIO_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,
    /// Public URL of the API, for the startup log
    #[arg(long, env = "WORKFOLIO_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,
}
