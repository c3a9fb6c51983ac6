use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 試算表欄位名稱（後端直接用表頭當 key）
pub mod keys {
    pub const INFLOW_MONTH: &str = "유입월";
    pub const SIGNUP_DATE: &str = "가입일";
    pub const COMPANY_ID: &str = "회사 ID";
    pub const COMPANY: &str = "회사명";
    pub const MARKETING_CONSENT: &str = "마케팅수신동의";
    pub const PHONE: &str = "연락처";
    pub const MANAGER: &str = "담당자";
    pub const EMAIL: &str = "이메일";
    pub const TEST_FLAG: &str = "테스트 여부";
    pub const CONTACT_1: &str = "1차 컨택";
    pub const CONTACT_2: &str = "2차 컨택";
    pub const CONTACT_3: &str = "3차 컨택 (종료일)";
    pub const D7_1: &str = "D7_1";
    pub const M1_1: &str = "M1_1";
    pub const D7_2: &str = "D7_2";
    pub const M1_2: &str = "M1_2";
    pub const SNAPSHOT: &str = "8/28";
    pub const MEMO: &str = "상담내용";
    pub const ACTION: &str = "후속조치";
    pub const END_DATE: &str = "종료일";

    // 後端加上的簿記欄位
    pub const ID: &str = "_id";
    pub const SHEET: &str = "_sheet";
    pub const ROW: &str = "_row";
    pub const META: &str = "_meta";
}

/// 試算表的一列。不強制 schema，未知欄位原樣保留。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialRecord {
    pub data: Map<String, Value>,
}

impl TrialRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 欄位的顯示文字；null 或不存在時回傳 None
    pub fn text(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// 非空白的欄位文字
    pub fn non_blank(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.data.get(keys::ID).and_then(Value::as_str)
    }

    pub fn sheet(&self) -> Option<&str> {
        self.data.get(keys::SHEET).and_then(Value::as_str)
    }

    pub fn row(&self) -> Option<u64> {
        match self.data.get(keys::ROW)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// 後端把彙總/分隔列標成 `_meta`
    pub fn is_meta(&self) -> bool {
        match self.data.get(keys::META) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

impl From<Value> for TrialRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(data) => Self { data },
            other => {
                let mut data = Map::new();
                data.insert("response".to_string(), other);
                Self { data }
            }
        }
    }
}

/// `GET /api/trials/{y,n}` 的回應
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialList {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub items: Vec<TrialRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub label: String,
    pub default_subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailRequest {
    pub id: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ok: bool,
}
