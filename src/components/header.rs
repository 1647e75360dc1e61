use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="page-header">
            <h1 class="page-title">"Status de Circulação - 12 horas"</h1>
            <p class="page-subtitle">"Relatório de turno"</p>
        </header>
    }
}
