use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::header::Header;
use crate::config::AppConfig;
use crate::pages::shift_report::ShiftReportPage;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <Router>
            <div class="app-layout">
                <Header />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Página não encontrada"</p> }>
                        <Route path=path!("/") view=ShiftReportPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
