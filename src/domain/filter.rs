use crate::domain::model::keys;
use crate::utils::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 查詢參數的 key
pub const PARAM_QUERY: &str = "q";
pub const PARAM_SHEET: &str = "sheet";
pub const PARAM_META: &str = "meta";
pub const PARAM_TEST_FLAG: &str = keys::TEST_FLAG;
pub const PARAM_MARKETING_CONSENT: &str = keys::MARKETING_CONSENT;

fn invalid(field: &str, value: &str, allowed: &str) -> ConsoleError {
    ConsoleError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("Expected one of: {}", allowed),
    }
}

/// 試算表分頁：트라이얼(Y) 或 트라이얼(N)，沒有「全部」
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sheet {
    #[default]
    Y,
    N,
}

impl Sheet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sheet::Y => "Y",
            Sheet::N => "N",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sheet::Y => "트라이얼(Y)",
            Sheet::N => "트라이얼(N)",
        }
    }
}

impl FromStr for Sheet {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(Sheet::Y),
            "N" => Ok(Sheet::N),
            _ => Err(invalid("sheet", s, "Y, N")),
        }
    }
}

/// 테스트 여부。`Unset` 送出空字串，跟明確的 N 不同
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagFilter {
    #[default]
    Unset,
    Yes,
    No,
}

impl FlagFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagFilter::Unset => "",
            FlagFilter::Yes => "Y",
            FlagFilter::No => "N",
        }
    }
}

impl FromStr for FlagFilter {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" => Ok(FlagFilter::Unset),
            "Y" => Ok(FlagFilter::Yes),
            "N" => Ok(FlagFilter::No),
            _ => Err(invalid("test_flag", s, "Y, N or empty")),
        }
    }
}

/// 마케팅수신동의，送出的值與試算表內容一致（동의/미동의）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentFilter {
    #[default]
    Unset,
    Agreed,
    Declined,
}

impl ConsentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentFilter::Unset => "",
            ConsentFilter::Agreed => "동의",
            ConsentFilter::Declined => "미동의",
        }
    }
}

impl FromStr for ConsentFilter {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Ok(ConsentFilter::Unset),
            "동의" | "Y" | "y" => Ok(ConsentFilter::Agreed),
            "미동의" | "N" | "n" => Ok(ConsentFilter::Declined),
            _ => Err(invalid("marketing_consent", s, "동의 (Y), 미동의 (N) or empty")),
        }
    }
}

/// 메타(구분/요약) 행 보기 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaMode {
    #[default]
    Exclude,
    Only,
    Include,
}

impl MetaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaMode::Exclude => "exclude",
            MetaMode::Only => "only",
            MetaMode::Include => "include",
        }
    }
}

impl FromStr for MetaMode {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(MetaMode::Exclude),
            "only" => Ok(MetaMode::Only),
            "include" => Ok(MetaMode::Include),
            _ => Err(invalid("meta", s, "exclude, only, include")),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Sheet, FlagFilter, ConsentFilter, MetaMode);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub q: String,
    pub sheet: Sheet,
    pub test_flag: FlagFilter,
    pub marketing_consent: ConsentFilter,
    pub meta_mode: MetaMode,
}

impl FilterCriteria {
    /// 轉成扁平的 key→string，五個 key 一律存在
    pub fn to_params(&self) -> FilterParams {
        FilterParams::from_pairs([
            (PARAM_QUERY, self.q.clone()),
            (PARAM_SHEET, self.sheet.as_str().to_string()),
            (PARAM_META, self.meta_mode.as_str().to_string()),
            (PARAM_TEST_FLAG, self.test_flag.as_str().to_string()),
            (PARAM_MARKETING_CONSENT, self.marketing_consent.as_str().to_string()),
        ])
    }
}

/// 依插入順序保存的查詢參數
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pairs: Vec<(String, String)>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }

    /// 同一個 key 再次寫入時覆蓋舊值
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
