use clap::Parser;
use std::sync::Arc;
use trial_console::adapters::export::export_csv_file;
use trial_console::config::cli::{Command, ListArgs, LogFormat, MailArgs, ShowArgs};
use trial_console::core::notice::Notice;
use trial_console::core::render::{render_detail, render_table, render_templates};
use trial_console::core::table::sorted;
use trial_console::domain::ports::TrialApi;
use trial_console::utils::error::ErrorSeverity;
use trial_console::utils::{logger, validation};
use trial_console::{
    CliConfig, ConsoleError, ConsoleSettings, FilterForm, HttpTrialApi, PageSize, ResultTable,
    SortState, TrialDetailPage, TrialListPage,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting trial-console");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> trial_console::Result<()> {
    let settings = cli.settings()?;
    tracing::debug!("Using backend {}", settings.base_url);
    let api = Arc::new(HttpTrialApi::from_config(&settings)?);

    match &cli.command {
        Command::List(args) => run_list(&settings, api, args).await,
        Command::Show(args) => run_show(api, args).await,
        Command::Templates => {
            let templates = api.list_templates().await?;
            print!("{}", render_templates(&templates));
            Ok(())
        }
        Command::Preview(args) => run_mail(api, args, false).await,
        Command::Send(args) => run_mail(api, args, true).await,
        Command::Health => {
            let status = api.health().await?;
            if status.ok {
                println!("✅ Backend is up: {}", settings.base_url);
                Ok(())
            } else {
                Err(ConsoleError::ApiError {
                    status: 503,
                    message: "Backend reported not ok".to_string(),
                })
            }
        }
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

async fn run_list(
    settings: &ConsoleSettings,
    api: Arc<HttpTrialApi>,
    args: &ListArgs,
) -> trial_console::Result<()> {
    validation::validate_positive_number("page", args.page as u64, 1)?;
    let page_size = match args.page_size {
        Some(size) => PageSize::try_from(size)?,
        None => settings.page_size()?,
    };

    let table = ResultTable::new(settings.columns.clone())
        .with_page_size(page_size)
        .with_row_click(Box::new(|record| {
            tracing::info!("➡️  Opening {}", record.id().unwrap_or("<no id>"));
        }));
    let mut page = TrialListPage::new(Arc::clone(&api), table);
    *page.form_mut() = FilterForm::from(args.criteria());

    let loaded = page.apply_filters().await;
    print_notices(page.take_notices());
    loaded?;

    if let Some(column) = &args.sort {
        page.set_sorting(SortState::by(column.as_str(), args.desc));
    }
    if args.page > 1 && !page.go_to_page(args.page - 1) {
        tracing::warn!("⚠️ Page {} is out of range, showing page 1", args.page);
    }

    println!("📋 {}", page.form().criteria().sheet.label());
    print!(
        "{}",
        render_table(&page.view(), page.table().columns(), page.sorting())
    );

    if let Some(path) = &args.export {
        validation::validate_path("export", path)?;
        let rows = sorted(page.items(), page.sorting());
        export_csv_file(path, page.table().columns(), &rows)?;
        println!("📁 Exported {} records to: {}", rows.len(), path);
    }

    if let Some(n) = args.open {
        let record = n
            .checked_sub(1)
            .and_then(|index| page.select_row(index))
            .ok_or_else(|| ConsoleError::validation(format!("Row {} is not on this page", n)))?;
        let id = record
            .id()
            .ok_or_else(|| ConsoleError::validation("Selected row has no _id"))?
            .to_string();
        println!();
        show_detail(TrialDetailPage::open(api, id).await)?;
    }

    Ok(())
}

fn show_detail(mut page: TrialDetailPage<HttpTrialApi>) -> trial_console::Result<()> {
    print_notices(page.take_notices());
    if page.item().is_none() {
        return Err(ConsoleError::validation(format!(
            "Could not load trial '{}'",
            page.id()
        )));
    }
    print!(
        "{}",
        render_detail(&page.title(), page.is_meta(), &page.sections())
    );
    Ok(())
}

async fn run_show(api: Arc<HttpTrialApi>, args: &ShowArgs) -> trial_console::Result<()> {
    validation::validate_record_id(&args.id)?;
    show_detail(TrialDetailPage::open(api, args.id.as_str()).await)
}

async fn run_mail(api: Arc<HttpTrialApi>, args: &MailArgs, send: bool) -> trial_console::Result<()> {
    validation::validate_record_id(&args.id)?;
    let mut page = TrialDetailPage::open(api, args.id.as_str()).await;
    print_notices(page.take_notices());

    if let Some(template) = &args.template {
        validation::validate_non_empty_string("template", template)?;
        if !page.select_template(template) {
            return Err(ConsoleError::InvalidConfigValueError {
                field: "template".to_string(),
                value: template.clone(),
                reason: "Unknown template; run `trial-console templates`".to_string(),
            });
        }
    }
    if let Some(subject) = &args.subject {
        page.set_subject(subject.as_str());
    }
    page.set_recipient_name(args.recipient_name.as_str());

    if send {
        let result = page.send().await;
        print_notices(page.take_notices());
        let response = result?;
        if let Some(message_id) = response.message_id {
            println!("📧 message_id: {}", message_id);
        }
        return Ok(());
    }

    let result = page.preview().await;
    print_notices(page.take_notices());
    let preview = result?;
    match &args.output {
        Some(path) => {
            validation::validate_path("output", path)?;
            std::fs::write(path, preview.html)?;
            println!("📁 Preview saved to: {}", path);
        }
        None => println!("{}", preview.html),
    }
    Ok(())
}
