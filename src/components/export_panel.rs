use leptos::prelude::*;

use crate::api::ReportKind;
use crate::browser::ControllerHandle;

#[component]
pub fn ExportPanel(controller: ControllerHandle) -> impl IntoView {
    let export = move |kind: ReportKind| {
        controller.spawn(move |c| async move { c.generate_report(kind).await });
    };
    let save_all = move |_| controller.spawn(|c| async move { c.save_all().await });

    view! {
        <section class="export-section">
            <button id="btn-gerar-pdf" class="btn btn-primary" on:click=move |_| export(ReportKind::Pdf)>
                "Gerar PDF"
            </button>
            <button id="btn-gerar-imagem" class="btn btn-primary" on:click=move |_| export(ReportKind::Image)>
                "Gerar Imagem"
            </button>
            <button id="btn-salvar-dados" class="btn btn-save" on:click=save_all>
                "Salvar Dados"
            </button>
        </section>
    }
}
