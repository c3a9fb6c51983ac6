use crate::domain::filter::FilterParams;
use crate::domain::model::{
    HealthStatus, MailRequest, PreviewResponse, SendResponse, Template, TrialList, TrialRecord,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 試用客戶後端。HTTP 實作在 `adapters::http`，測試可以換成假的。
#[async_trait]
pub trait TrialApi: Send + Sync {
    async fn list_trials(&self, params: &FilterParams) -> Result<TrialList>;
    async fn get_trial(&self, id: &str) -> Result<TrialRecord>;
    async fn list_templates(&self) -> Result<Vec<Template>>;
    async fn send_mail(&self, request: &MailRequest) -> Result<SendResponse>;
    async fn preview_mail(&self, request: &MailRequest) -> Result<PreviewResponse>;
    async fn health(&self) -> Result<HealthStatus>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn headers(&self) -> &HashMap<String, String>;
}
