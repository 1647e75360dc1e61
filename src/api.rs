//! Client for the shift report backend.
//!
//! [`ShiftApi`] is the contract the controller depends on; [`HttpApi`] is the
//! browser implementation over `fetch`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::error::{js_error_text, ApiError};
use crate::model::{ShiftInfo, Stats, TrainRecord};

/// Document the server can render from the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Pdf,
    Image,
}

impl ReportKind {
    fn path(self) -> &'static str {
        match self {
            ReportKind::Pdf => "/gerar-pdf",
            ReportKind::Image => "/gerar-imagem",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ReportKind::Pdf => "application/pdf",
            ReportKind::Image => "image/png",
        }
    }

    /// Download name, stamped with the given day.
    pub fn filename(self, day: NaiveDate) -> String {
        let stamp = day.format("%Y-%m-%d");
        match self {
            ReportKind::Pdf => format!("relatorio_trens_{}.pdf", stamp),
            ReportKind::Image => format!("resumo_trens_{}.png", stamp),
        }
    }
}

/// Binary body of a generated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Backend operations used by the form.
#[allow(async_fn_in_trait)]
pub trait ShiftApi {
    async fn get_shift_info(&self) -> Result<ShiftInfo, ApiError>;
    async fn save_shift_info(&self, info: &ShiftInfo) -> Result<(), ApiError>;
    async fn get_records(&self) -> Result<Vec<TrainRecord>, ApiError>;
    async fn save_records(&self, records: &[TrainRecord]) -> Result<(), ApiError>;
    /// Append a blank record server-side.
    async fn add_record(&self) -> Result<(), ApiError>;
    async fn remove_record(&self, index: usize) -> Result<(), ApiError>;
    /// Ask the server to classify both status fields of one record.
    async fn calculate_status(&self, record: &TrainRecord) -> Result<TrainRecord, ApiError>;
    async fn clear_data(&self) -> Result<(), ApiError>;
    async fn get_stats(&self) -> Result<Stats, ApiError>;
    async fn generate_report(&self, kind: ReportKind) -> Result<ReportFile, ApiError>;
}

/// [`ShiftApi`] over the browser Fetch API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, method: &str, path: &str, body: Option<String>) -> Result<Response, ApiError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ApiError::Browser(js_error_text(&e)))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| ApiError::Browser(js_error_text(&e)))?;
        }

        let window = web_sys::window().ok_or_else(|| ApiError::Browser("No window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(js_error_text(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| ApiError::Browser("fetch did not return a Response".to_string()))?;

        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                url,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send("GET", path, None).await?;
        read_json(&response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.send("POST", path, Some(body)).await
    }
}

async fn read_json<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    let promise = response
        .json()
        .map_err(|e| ApiError::Decode(js_error_text(&e)))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| ApiError::Decode(js_error_text(&e)))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

impl ShiftApi for HttpApi {
    async fn get_shift_info(&self) -> Result<ShiftInfo, ApiError> {
        self.get_json("/info-turno").await
    }

    async fn save_shift_info(&self, info: &ShiftInfo) -> Result<(), ApiError> {
        self.post_json("/info-turno", info).await.map(|_| ())
    }

    async fn get_records(&self) -> Result<Vec<TrainRecord>, ApiError> {
        self.get_json("/trens").await
    }

    async fn save_records(&self, records: &[TrainRecord]) -> Result<(), ApiError> {
        self.post_json("/trens", records).await.map(|_| ())
    }

    async fn add_record(&self) -> Result<(), ApiError> {
        self.send("POST", "/trens/adicionar", None).await.map(|_| ())
    }

    async fn remove_record(&self, index: usize) -> Result<(), ApiError> {
        self.send("DELETE", &format!("/trens/{}", index), None)
            .await
            .map(|_| ())
    }

    async fn calculate_status(&self, record: &TrainRecord) -> Result<TrainRecord, ApiError> {
        let response = self.post_json("/calcular-status", record).await?;
        read_json(&response).await
    }

    async fn clear_data(&self) -> Result<(), ApiError> {
        self.send("POST", "/limpar-dados", None).await.map(|_| ())
    }

    async fn get_stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/estatisticas").await
    }

    async fn generate_report(&self, kind: ReportKind) -> Result<ReportFile, ApiError> {
        let response = self.send("POST", kind.path(), None).await?;

        let content_type = response
            .headers()
            .get("Content-Type")
            .ok()
            .flatten()
            .unwrap_or_else(|| kind.mime_type().to_string());

        let promise = response
            .array_buffer()
            .map_err(|e| ApiError::Decode(js_error_text(&e)))?;
        let buffer = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::Decode(js_error_text(&e)))?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

        Ok(ReportFile { bytes, content_type })
    }
}
