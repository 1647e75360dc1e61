use leptos::prelude::*;

#[component]
pub fn LoadingOverlay(loading: RwSignal<bool>) -> impl IntoView {
    view! {
        <div
            id="loading-overlay"
            class="loading-overlay"
            style:display=move || if loading.get() { "flex" } else { "none" }
        >
            <div class="spinner"></div>
            <p>"Gerando..."</p>
        </div>
    }
}
