use crate::config::toml_config::TomlConfig;
use crate::core::table::{default_columns, Column, PageSize, PAGE_SIZES};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;

pub const DEFAULT_API: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// TOML 檔與命令列合併後的實際設定
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleSettings {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub page_size: usize,
    pub columns: Vec<Column>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API.to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            columns: default_columns(),
        }
    }
}

impl ConsoleSettings {
    pub fn from_toml(config: TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config.api.base_url.unwrap_or(defaults.base_url),
            timeout_seconds: config.api.timeout_seconds,
            headers: config.api.headers.unwrap_or_default(),
            page_size: config.display.page_size.unwrap_or(defaults.page_size),
            columns: config.display.columns.unwrap_or(defaults.columns),
        }
    }

    /// 命令列優先於設定檔
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_seconds: Option<u64>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if timeout_seconds.is_some() {
            self.timeout_seconds = timeout_seconds;
        }
        self
    }

    pub fn page_size(&self) -> Result<PageSize> {
        PageSize::try_from(self.page_size)
    }
}

impl ConfigProvider for ConsoleSettings {
    fn api_base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for ConsoleSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api", &self.base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout", timeout, 1)?;
        }
        validation::validate_one_of("page_size", self.page_size, &PAGE_SIZES)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_to_local_backend() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.api_base_url(), "http://localhost:8080");
        assert_eq!(settings.page_size().unwrap(), PageSize::Ten);
        assert_eq!(settings.columns.len(), 17);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let file = TomlConfig::from_toml_str(
            "[api]\nbase_url = \"http://file:8080\"\ntimeout_seconds = 30\n[display]\npage_size = 50\n",
        )
        .unwrap();

        let settings = ConsoleSettings::from_toml(file)
            .with_overrides(Some("http://flag:9090".to_string()), None);

        assert_eq!(settings.base_url, "http://flag:9090");
        assert_eq!(settings.timeout_seconds, Some(30));
        assert_eq!(settings.page_size, 50);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let settings = ConsoleSettings::default().with_overrides(None, Some(0));
        assert!(settings.validate().is_err());
    }
}
