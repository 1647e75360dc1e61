use leptos::prelude::*;

use crate::components::status_chart::StatusChart;
use crate::model::Stats;
use crate::view_model::stat_counters;

#[component]
pub fn StatsPanel(stats: RwSignal<Stats>) -> impl IntoView {
    view! {
        <section class="stats-section">
            <div class="stat-cards">
                {move || {
                    stat_counters(&stats.get())
                        .into_iter()
                        .map(|counter| {
                            view! {
                                <div class=format!("stat-card {}", counter.class)>
                                    <span class="stat-value" id=counter.id>{counter.value}</span>
                                    <span class="stat-label">{counter.label}</span>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            <StatusChart stats=stats />
        </section>
    }
}
