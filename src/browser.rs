//! Browser side of the controller: signals for rendering, `web-sys` for
//! dialogs and downloads.

use std::future::Future;
use std::rc::Rc;

use chrono::NaiveDate;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::api::{HttpApi, ReportFile};
use crate::controller::{FormController, Host};
use crate::error::js_error_text;
use crate::model::{ShiftInfo, Stats, TrainRecord};

pub type Controller = FormController<HttpApi, BrowserHost>;

/// Reactive state the page renders from.
#[derive(Clone, Copy)]
pub struct PageSignals {
    pub records: RwSignal<Vec<TrainRecord>>,
    pub shift_info: RwSignal<ShiftInfo>,
    pub stats: RwSignal<Stats>,
    pub loading: RwSignal<bool>,
}

impl PageSignals {
    pub fn new() -> Self {
        Self {
            records: RwSignal::new(vec![]),
            shift_info: RwSignal::new(ShiftInfo::default()),
            stats: RwSignal::new(Stats::default()),
            loading: RwSignal::new(false),
        }
    }
}

pub struct BrowserHost {
    signals: PageSignals,
}

impl BrowserHost {
    pub fn new(signals: PageSignals) -> Self {
        Self { signals }
    }
}

impl Host for BrowserHost {
    fn render_records(&self, records: &[TrainRecord]) {
        self.signals.records.set(records.to_vec());
    }

    fn show_shift_info(&self, info: &ShiftInfo) {
        self.signals.shift_info.set(info.clone());
    }

    fn show_stats(&self, stats: &Stats) {
        self.signals.stats.set(*stats);
    }

    fn read_shift_info(&self) -> ShiftInfo {
        self.signals.shift_info.get_untracked()
    }

    fn set_loading(&self, visible: bool) {
        self.signals.loading.set(visible);
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn download(&self, file: &ReportFile, filename: &str) -> Result<(), String> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let body = document.body().ok_or("No document body")?;

        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(&file.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| js_error_text(&e))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error_text(&e))?;

        with_object_url(
            &url,
            |url| {
                let anchor: HtmlAnchorElement = document
                    .create_element("a")
                    .map_err(|e| js_error_text(&e))?
                    .dyn_into()
                    .map_err(|_| "Created element is not an anchor".to_string())?;
                anchor.set_href(url);
                anchor.set_download(filename);

                body.append_child(&anchor).map_err(|e| js_error_text(&e))?;
                anchor.click();
                body.remove_child(&anchor).map_err(|e| js_error_text(&e))?;
                Ok(())
            },
            |url| Url::revoke_object_url(url).map_err(|e| js_error_text(&e)),
        )
    }

    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Run `body` with an object URL, then revoke it whatever the outcome. The
/// first error wins.
fn with_object_url<T>(
    url: &str,
    body: impl FnOnce(&str) -> Result<T, String>,
    revoke: impl FnOnce(&str) -> Result<(), String>,
) -> Result<T, String> {
    let result = body(url);
    let revoked = revoke(url);
    if let Err(e) = &revoked {
        tracing::warn!("Failed to revoke {}: {}", url, e);
    }
    let value = result?;
    revoked?;
    Ok(value)
}

/// Copyable handle to the page's controller, usable from event handlers.
#[derive(Clone, Copy)]
pub struct ControllerHandle(StoredValue<Rc<Controller>, LocalStorage>);

impl ControllerHandle {
    pub fn new(controller: Controller) -> Self {
        Self(StoredValue::new_local(Rc::new(controller)))
    }

    /// Run a controller action on the UI task queue.
    pub fn spawn<F, Fut>(&self, action: F)
    where
        F: FnOnce(Rc<Controller>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let controller = self.0.get_value();
        spawn_local(action(controller));
    }
}
