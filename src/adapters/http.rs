use crate::core::query::{
    detail_url, endpoint_url, error_message, ListQuery, HEALTH_PATH, PREVIEW_PATH, SEND_PATH,
    TEMPLATES_PATH,
};
use crate::domain::filter::FilterParams;
use crate::domain::model::{
    HealthStatus, MailRequest, PreviewResponse, SendResponse, Template, TrialList, TrialRecord,
};
use crate::domain::ports::{ConfigProvider, TrialApi};
use crate::utils::error::{ConsoleError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// 以 reqwest 呼叫試用客戶後端。沒有重試、沒有快取。
#[derive(Debug, Clone)]
pub struct HttpTrialApi {
    base_url: Url,
    client: Client,
    headers: HashMap<String, String>,
}

impl HttpTrialApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: Client::new(),
            headers: HashMap::new(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            base_url: Url::parse(config.api_base_url())?,
            client: builder.build()?,
            headers: config.headers().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.with_headers(self.client.get(url)).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, url: Url, body: &MailRequest) -> Result<T> {
        tracing::debug!("POST {}", url);
        let response = self
            .with_headers(self.client.post(url))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// 先讀成文字，非 2xx 時盡量帶出後端的錯誤訊息
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ConsoleError::ApiError {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TrialApi for HttpTrialApi {
    async fn list_trials(&self, params: &FilterParams) -> Result<TrialList> {
        let url = ListQuery::from_params(params).url(&self.base_url)?;
        self.get_json(url).await
    }

    async fn get_trial(&self, id: &str) -> Result<TrialRecord> {
        let url = detail_url(&self.base_url, id)?;
        self.get_json(url).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        let url = endpoint_url(&self.base_url, TEMPLATES_PATH)?;
        self.get_json(url).await
    }

    async fn send_mail(&self, request: &MailRequest) -> Result<SendResponse> {
        let url = endpoint_url(&self.base_url, SEND_PATH)?;
        self.post_json(url, request).await
    }

    async fn preview_mail(&self, request: &MailRequest) -> Result<PreviewResponse> {
        let url = endpoint_url(&self.base_url, PREVIEW_PATH)?;
        self.post_json(url, request).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = endpoint_url(&self.base_url, HEALTH_PATH)?;
        self.get_json(url).await
    }
}
