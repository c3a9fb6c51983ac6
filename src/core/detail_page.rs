use crate::core::notice::Notice;
use crate::domain::model::{keys, MailRequest, PreviewResponse, SendResponse, Template, TrialRecord};
use crate::domain::ports::TrialApi;
use crate::utils::error::{ConsoleError, Result};
use serde_json::{Map, Value};
use std::sync::Arc;

/// 詳細頁的一個區塊（標題 + label/value 列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, Option<String>)>,
}

/// 單筆試用客戶詳細頁與寄信流程
pub struct TrialDetailPage<A: TrialApi> {
    api: Arc<A>,
    id: String,
    item: Option<TrialRecord>,
    templates: Vec<Template>,
    selected_template: Option<String>,
    subject: String,
    recipient_name: String,
    notices: Vec<Notice>,
}

impl<A: TrialApi> TrialDetailPage<A> {
    /// 記錄與範本清單分開載入，任一失敗只記通知
    pub async fn open(api: Arc<A>, id: impl Into<String>) -> Self {
        let id = id.into();
        let (item, templates) = tokio::join!(api.get_trial(&id), api.list_templates());

        let mut page = Self {
            api,
            id,
            item: None,
            templates: Vec::new(),
            selected_template: None,
            subject: String::new(),
            recipient_name: String::new(),
            notices: Vec::new(),
        };

        match item {
            Ok(record) => page.item = Some(record),
            Err(e) => {
                tracing::error!("❌ Failed to load trial '{}': {}", page.id, e);
                page.notices.push(Notice::error("상세 조회 실패", e.to_string()));
            }
        }

        match templates {
            Ok(list) => {
                if let Some(first) = list.first() {
                    page.selected_template = Some(first.id.clone());
                    page.subject = first.default_subject.clone();
                }
                page.templates = list;
            }
            Err(e) => {
                tracing::error!("❌ Failed to load mail templates: {}", e);
                page.notices.push(Notice::error("템플릿 목록 로드 실패", e.to_string()));
            }
        }

        page
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn item(&self) -> Option<&TrialRecord> {
        self.item.as_ref()
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    /// 換範本時主旨改成該範本的預設值；不認得的 id 回傳 false
    pub fn select_template(&mut self, template_id: &str) -> bool {
        match self.templates.iter().find(|t| t.id == template_id) {
            Some(template) => {
                self.selected_template = Some(template.id.clone());
                self.subject = template.default_subject.clone();
                true
            }
            None => false,
        }
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_recipient_name(&mut self, name: impl Into<String>) {
        self.recipient_name = name.into();
    }

    /// `회사명 (담당자)`，沒有公司名稱時用 id
    pub fn title(&self) -> String {
        let Some(item) = &self.item else {
            return String::new();
        };

        let company = item
            .non_blank(keys::COMPANY)
            .or_else(|| item.non_blank("company"));
        let manager = item
            .non_blank(keys::MANAGER)
            .or_else(|| item.non_blank("manager"));

        match company {
            Some(company) => format!("{} ({})", company, manager.as_deref().unwrap_or("-")),
            None => item.id().unwrap_or(&self.id).to_string(),
        }
    }

    pub fn is_meta(&self) -> bool {
        self.item.as_ref().is_some_and(TrialRecord::is_meta)
    }

    pub fn sections(&self) -> Vec<DetailSection> {
        let Some(item) = &self.item else {
            return Vec::new();
        };

        let field = |key: &str| item.non_blank(key);
        let either = |key: &str, fallback: &str| field(key).or_else(|| field(fallback));

        vec![
            DetailSection {
                title: "기본 정보",
                rows: vec![
                    (keys::COMPANY_ID, field(keys::COMPANY_ID)),
                    (keys::COMPANY, field(keys::COMPANY)),
                    (keys::MANAGER, field(keys::MANAGER)),
                    (keys::EMAIL, field(keys::EMAIL)),
                    (keys::PHONE, field(keys::PHONE)),
                    (keys::INFLOW_MONTH, field(keys::INFLOW_MONTH)),
                    (keys::SIGNUP_DATE, field(keys::SIGNUP_DATE)),
                    (keys::MARKETING_CONSENT, field(keys::MARKETING_CONSENT)),
                    (keys::TEST_FLAG, field(keys::TEST_FLAG)),
                    ("시트", field(keys::SHEET)),
                    ("행번호", field(keys::ROW)),
                    ("ID", field(keys::ID)),
                ],
            },
            DetailSection {
                title: "컨택 & 종료",
                rows: vec![
                    (keys::CONTACT_1, field(keys::CONTACT_1)),
                    (keys::CONTACT_2, field(keys::CONTACT_2)),
                    (keys::CONTACT_3, field(keys::CONTACT_3)),
                    (keys::END_DATE, field(keys::END_DATE)),
                ],
            },
            DetailSection {
                title: "D7 / M1 지표",
                rows: vec![
                    (keys::D7_1, either(keys::D7_1, "d7_1")),
                    (keys::M1_1, either(keys::M1_1, "m1_1")),
                    (keys::D7_2, either(keys::D7_2, "d7_2")),
                    (keys::M1_2, either(keys::M1_2, "m1_2")),
                    (keys::SNAPSHOT, either(keys::SNAPSHOT, "snapshot")),
                ],
            },
            DetailSection {
                title: "상담 / 후속",
                rows: vec![
                    (keys::MEMO, field(keys::MEMO)),
                    (keys::ACTION, field(keys::ACTION)),
                ],
            },
        ]
    }

    /// 組出寄信/預覽的 payload；context 只帶 recipient_name
    pub fn mail_request(&self) -> Result<MailRequest> {
        let item = self
            .item
            .as_ref()
            .ok_or_else(|| ConsoleError::validation(format!("Trial '{}' is not loaded", self.id)))?;
        let template = self
            .selected_template
            .clone()
            .ok_or_else(|| ConsoleError::validation("No mail template selected"))?;

        let mut context = Map::new();
        context.insert(
            "recipient_name".to_string(),
            Value::String(self.recipient_name.clone()),
        );

        Ok(MailRequest {
            id: item.id().unwrap_or(&self.id).to_string(),
            template,
            subject: Some(self.subject.clone()).filter(|s| !s.trim().is_empty()),
            context,
        })
    }

    /// 彙總/分隔列不能寄信
    pub async fn send(&mut self) -> Result<SendResponse> {
        if self.is_meta() {
            self.notices.push(Notice::warning("메타(요약/구분) 행에는 메일을 보낼 수 없습니다"));
            return Err(ConsoleError::validation("Meta rows cannot receive mail"));
        }
        if self.item.is_some() && self.selected_template.is_none() {
            self.notices.push(Notice::warning("템플릿을 선택해 주세요"));
        }
        let request = self.mail_request()?;

        tracing::info!("📧 Sending '{}' to trial '{}'", request.template, request.id);
        match self.api.send_mail(&request).await {
            Ok(response) => {
                self.notices.push(Notice::success(
                    "메일 전송 완료",
                    Some(self.subject.clone()),
                ));
                Ok(response)
            }
            Err(e) => {
                tracing::error!("❌ Mail send failed: {}", e);
                self.notices.push(Notice::error("메일 전송 실패", e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn preview(&mut self) -> Result<PreviewResponse> {
        let request = self.mail_request()?;

        tracing::debug!("Rendering preview of '{}' for '{}'", request.template, request.id);
        match self.api.preview_mail(&request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::error!("❌ Mail preview failed: {}", e);
                self.notices.push(Notice::error("미리보기 실패", e.to_string()));
                Err(e)
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
