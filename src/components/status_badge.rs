use leptos::prelude::*;

use crate::view_model::StatusCell;

/// Table cell showing a server-assigned status.
#[component]
pub fn StatusBadge(
    /// Label and class of the status, e.g. "Atrasado" / "status-atrasado"
    cell: StatusCell,
) -> impl IntoView {
    let class = format!("status-badge {}", cell.class);

    view! {
        <td class=class title=cell.key>{cell.label}</td>
    }
}
