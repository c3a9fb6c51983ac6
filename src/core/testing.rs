use crate::domain::filter::FilterParams;
use crate::domain::model::{
    HealthStatus, MailRequest, PreviewResponse, SendResponse, Template, TrialList, TrialRecord,
};
use crate::domain::ports::TrialApi;
use crate::utils::error::{ConsoleError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

/// 單元測試用的假後端，記錄每次呼叫
#[derive(Default)]
pub struct FakeTrialApi {
    records: Mutex<Vec<TrialRecord>>,
    templates: Mutex<Vec<Template>>,
    list_calls: Mutex<Vec<FilterParams>>,
    sent: Mutex<Vec<MailRequest>>,
    previewed: Mutex<Vec<MailRequest>>,
    list_failure: Mutex<Option<String>>,
    templates_fail: Mutex<bool>,
}

impl FakeTrialApi {
    pub fn with_records(n: usize) -> Self {
        let api = Self::default();
        api.set_records(
            (0..n)
                .map(|i| json!({"_id": format!("트라이얼(Y):{}", i + 2), "회사명": format!("회사 {:03}", i)}))
                .collect(),
        );
        api
    }

    pub fn set_records(&self, records: Vec<Value>) {
        *self.records.lock().unwrap() = records.into_iter().map(TrialRecord::from).collect();
    }

    pub fn set_templates(&self, templates: Vec<Template>) {
        *self.templates.lock().unwrap() = templates;
    }

    pub fn fail_next_list(&self, message: &str) {
        *self.list_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_templates(&self) {
        *self.templates_fail.lock().unwrap() = true;
    }

    pub fn list_calls(&self) -> Vec<FilterParams> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<MailRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn previewed(&self) -> Vec<MailRequest> {
        self.previewed.lock().unwrap().clone()
    }
}

pub fn template(id: &str, subject: &str) -> Template {
    Template {
        id: id.to_string(),
        label: format!("[이폼사인] {}", subject),
        default_subject: subject.to_string(),
    }
}

#[async_trait]
impl TrialApi for FakeTrialApi {
    async fn list_trials(&self, params: &FilterParams) -> Result<TrialList> {
        self.list_calls.lock().unwrap().push(params.clone());
        if let Some(message) = self.list_failure.lock().unwrap().take() {
            return Err(ConsoleError::ApiError { status: 500, message });
        }
        let items = self.records.lock().unwrap().clone();
        Ok(TrialList {
            count: Some(items.len()),
            items,
        })
    }

    async fn get_trial(&self, id: &str) -> Result<TrialRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or_else(|| ConsoleError::ApiError {
                status: 404,
                message: "HTTP 404".to_string(),
            })
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        if *self.templates_fail.lock().unwrap() {
            return Err(ConsoleError::ApiError {
                status: 500,
                message: "HTTP 500".to_string(),
            });
        }
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn send_mail(&self, request: &MailRequest) -> Result<SendResponse> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(SendResponse {
            ok: true,
            message_id: Some("msg-1".to_string()),
        })
    }

    async fn preview_mail(&self, request: &MailRequest) -> Result<PreviewResponse> {
        self.previewed.lock().unwrap().push(request.clone());
        Ok(PreviewResponse {
            html: format!("<p>{}</p>", request.template),
        })
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus { ok: true })
    }
}
