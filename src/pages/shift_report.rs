use leptos::prelude::*;

use crate::api::HttpApi;
use crate::browser::{BrowserHost, ControllerHandle, PageSignals};
use crate::components::export_panel::ExportPanel;
use crate::components::loading_overlay::LoadingOverlay;
use crate::components::shift_info_form::ShiftInfoForm;
use crate::components::stats_panel::StatsPanel;
use crate::components::train_table::TrainTable;
use crate::config::AppConfig;
use crate::controller::FormController;

#[component]
pub fn ShiftReportPage() -> impl IntoView {
    let config = use_context::<AppConfig>().unwrap_or_default();
    let signals = PageSignals::new();

    let controller = ControllerHandle::new(FormController::new(
        HttpApi::new(config.api_base),
        BrowserHost::new(signals),
    ));

    // Default the date, then pull the session from the server
    Effect::new(move |_| {
        controller.spawn(|c| async move { c.start().await });
    });

    view! {
        <div class="page shift-report-page">
            <ShiftInfoForm shift_info=signals.shift_info controller=controller />
            <StatsPanel stats=signals.stats />
            <TrainTable records=signals.records controller=controller />
            <ExportPanel controller=controller />
            <LoadingOverlay loading=signals.loading />
        </div>
    }
}
