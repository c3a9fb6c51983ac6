use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;
use trial_console::adapters::export::export_csv_file;
use trial_console::config::toml_config::TomlConfig;
use trial_console::core::table::{sorted, SortState};
use trial_console::domain::model::TrialRecord;
use trial_console::utils::validation::Validate;
use trial_console::{ConsoleSettings, PageSize};

#[test]
fn test_config_file_with_custom_columns() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("console.toml");
    std::fs::write(
        &config_path,
        r#"
[api]
base_url = "http://trials.internal:8080"
timeout_seconds = 15

[api.headers]
X-Console = "trials"

[display]
page_size = 25

[[display.columns]]
key = "회사명"
header = "회사"

[[display.columns]]
key = "가입일"
header = "가입일"
"#,
    )?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    let settings = ConsoleSettings::from_toml(config);

    assert_eq!(settings.base_url, "http://trials.internal:8080");
    assert_eq!(settings.timeout_seconds, Some(15));
    assert_eq!(settings.headers.get("X-Console").map(String::as_str), Some("trials"));
    assert_eq!(settings.page_size()?, PageSize::TwentyFive);
    assert_eq!(settings.columns.len(), 2);
    assert_eq!(settings.columns[0].header, "회사");
    Ok(())
}

#[test]
fn test_unsupported_page_size_fails_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("console.toml");
    std::fs::write(&config_path, "[display]\npage_size = 30\n")?;

    let settings = ConsoleSettings::from_toml(TomlConfig::from_file(&config_path)?);
    assert!(settings.validate().is_err());
    assert!(settings.page_size().is_err());
    Ok(())
}

#[test]
fn test_export_writes_sorted_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("out").join("trials.csv");

    let records: Vec<TrialRecord> = vec![
        json!({"회사명": "나나", "가입일": "2024-08-20"}).into(),
        json!({"회사명": "가가", "가입일": "2024-08-03"}).into(),
        json!({"회사명": "다다"}).into(),
    ];
    let settings = ConsoleSettings::default();
    let columns: Vec<_> = settings
        .columns
        .iter()
        .filter(|c| c.key == "회사명" || c.key == "가입일")
        .cloned()
        .collect();

    let rows = sorted(&records, &SortState::by("가입일", false));
    export_csv_file(&output, &columns, &rows)?;

    let mut reader = csv::Reader::from_path(&output)?;
    let company_index = reader
        .headers()?
        .iter()
        .position(|h| h == "회사명")
        .expect("company column");
    let companies: Vec<String> = reader
        .records()
        .map(|row| row.map(|r| r[company_index].to_string()))
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(companies, vec!["가가", "나나", "다다"]);
    Ok(())
}
