use crate::domain::filter::{FilterParams, PARAM_SHEET};
use crate::utils::error::{ConsoleError, Result};
use url::Url;

pub const TRIALS_PATH: &str = "/api/trials";
pub const TRIALS_Y_PATH: &str = "/api/trials/y";
pub const TRIALS_N_PATH: &str = "/api/trials/n";
pub const TEMPLATES_PATH: &str = "/api/templates";
pub const SEND_PATH: &str = "/api/send";
pub const PREVIEW_PATH: &str = "/api/preview";
pub const HEALTH_PATH: &str = "/api/health";

/// 列表查詢：sheet 決定打哪個 endpoint，其餘參數放 query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub endpoint: &'static str,
    pub params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn from_params(params: &FilterParams) -> Self {
        let endpoint = match params.get(PARAM_SHEET) {
            Some("N") => TRIALS_N_PATH,
            _ => TRIALS_Y_PATH,
        };

        let params = params
            .iter()
            .filter(|(key, _)| *key != PARAM_SHEET)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self { endpoint, params }
    }

    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = endpoint_url(base, self.endpoint)?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// 在 base URL 後面接上 API 路徑，保留 base 本身的路徑前綴
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?)
}

/// 單筆記錄的 URL，id 含韓文與特殊字元，需逐段編碼
pub fn detail_url(base: &Url, id: &str) -> Result<Url> {
    let mut url = endpoint_url(base, TRIALS_PATH)?;
    url.path_segments_mut()
        .map_err(|_| ConsoleError::config(format!("API base URL cannot have paths: {}", base)))?
        .push(id);
    Ok(url)
}

/// 非 2xx 回應的錯誤訊息：JSON 的 `error` 欄位 > 原始內容 > 狀態碼
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(serde_json::Value::String(error)) = obj.get("error") {
            if !error.is_empty() {
                return error.clone();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("HTTP {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterCriteria, Sheet};

    fn base() -> Url {
        Url::parse("http://localhost:8080").unwrap()
    }

    #[test]
    fn test_sheet_n_routes_to_n_endpoint() {
        let params = FilterCriteria {
            sheet: Sheet::N,
            ..Default::default()
        }
        .to_params();

        let query = ListQuery::from_params(&params);
        assert_eq!(query.endpoint, TRIALS_N_PATH);
    }

    #[test]
    fn test_other_or_missing_sheet_routes_to_y_endpoint() {
        let y = FilterCriteria::default().to_params();
        let odd = FilterParams::from_pairs([("sheet", "ALL")]);
        let missing = FilterParams::new();

        assert_eq!(ListQuery::from_params(&y).endpoint, TRIALS_Y_PATH);
        assert_eq!(ListQuery::from_params(&odd).endpoint, TRIALS_Y_PATH);
        assert_eq!(ListQuery::from_params(&missing).endpoint, TRIALS_Y_PATH);
    }

    #[test]
    fn test_sheet_is_not_sent_as_query_parameter() {
        let params = FilterCriteria::default().to_params();
        let query = ListQuery::from_params(&params);

        assert_eq!(query.params.len(), 4);
        assert!(query.params.iter().all(|(k, _)| k != "sheet"));
        assert!(query
            .params
            .iter()
            .any(|(k, v)| k == "테스트 여부" && v.is_empty()));
    }

    #[test]
    fn test_url_keeps_korean_keys_and_base_prefix() {
        let params = FilterParams::from_pairs([("q", "포시에스"), ("마케팅수신동의", "동의")]);
        let base = Url::parse("https://admin.example.com/backend/").unwrap();
        let url = ListQuery::from_params(&params).url(&base).unwrap();

        assert_eq!(url.path(), "/backend/api/trials/y");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "포시에스".to_string()),
                ("마케팅수신동의".to_string(), "동의".to_string()),
            ]
        );
    }

    #[test]
    fn test_detail_url_encodes_id() {
        let url = detail_url(&base(), "트라이얼(Y):12").unwrap();
        assert!(url.path().starts_with("/api/trials/"));
        assert!(!url.path().contains(' '));
        let last = url.path_segments().unwrap().last().unwrap().to_string();
        assert_eq!(
            url::form_urlencoded::parse(format!("x={}", last).as_bytes())
                .next()
                .map(|(_, v)| v.into_owned()),
            Some("트라이얼(Y):12".to_string())
        );
    }

    #[test]
    fn test_error_message_prefers_json_error_field() {
        assert_eq!(error_message(400, r#"{"error":"invalid id"}"#), "invalid id");
        assert_eq!(error_message(500, "Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(502, r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
        assert_eq!(error_message(503, "   "), "HTTP 503");
    }
}
