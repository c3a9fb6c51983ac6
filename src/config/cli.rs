use crate::config::settings::ConsoleSettings;
use crate::config::toml_config::TomlConfig;
use crate::domain::filter::{ConsentFilter, FilterCriteria, FlagFilter, MetaMode, Sheet};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "trial-console")]
#[command(about = "Admin console for spreadsheet-backed trial customers")]
pub struct CliConfig {
    /// Trials backend base URL
    #[arg(long, env = "TRIAL_API", global = true)]
    pub api: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List trial records with filters, sorting and paging
    List(ListArgs),
    /// Show one trial record
    Show(ShowArgs),
    /// List mail templates
    Templates,
    /// Render a mail template for a record without sending it
    Preview(MailArgs),
    /// Send a templated mail to a record's contact
    Send(MailArgs),
    /// Check that the backend is up
    Health,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Free-text search (company, manager, email, notes)
    #[arg(short, long, default_value = "")]
    pub q: String,

    /// Sheet to list: Y or N
    #[arg(long, default_value = "Y")]
    pub sheet: Sheet,

    /// 테스트 여부 filter: Y or N
    #[arg(long = "test")]
    pub test_flag: Option<FlagFilter>,

    /// 마케팅수신동의 filter: 동의/미동의 (or Y/N)
    #[arg(long = "consent")]
    pub marketing_consent: Option<ConsentFilter>,

    /// Meta row mode: exclude, only, include
    #[arg(long, default_value = "exclude")]
    pub meta: MetaMode,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 10, 25, 50 or 100
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write the full sorted result to a CSV file
    #[arg(long)]
    pub export: Option<String>,

    /// Open the n-th row of the shown page (starting at 1)
    #[arg(long)]
    pub open: Option<usize>,
}

impl ListArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            q: self.q.clone(),
            sheet: self.sheet,
            test_flag: self.test_flag.unwrap_or_default(),
            marketing_consent: self.marketing_consent.unwrap_or_default(),
            meta_mode: self.meta,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Record id, e.g. "트라이얼(Y):12"
    pub id: String,
}

#[derive(Debug, Clone, Args)]
pub struct MailArgs {
    /// Record id, e.g. "트라이얼(Y):12"
    pub id: String,

    /// Template id (defaults to the first template)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Subject (defaults to the template's subject)
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Recipient display name
    #[arg(long, default_value = "")]
    pub recipient_name: String,

    /// Write the preview HTML to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

impl CliConfig {
    /// 設定檔（若有）+ 命令列覆蓋，驗證後回傳
    pub fn settings(&self) -> Result<ConsoleSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => TomlConfig::default(),
        };

        let settings =
            ConsoleSettings::from_toml(file).with_overrides(self.api.clone(), self.timeout);
        settings.validate()?;
        Ok(settings)
    }
}
