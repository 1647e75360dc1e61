//! Editable train table. The body is rebuilt from scratch whenever the
//! record list is replaced.

use leptos::prelude::*;

use crate::browser::ControllerHandle;
use crate::components::status_badge::StatusBadge;
use crate::model::{RecordField, TrainRecord};
use crate::view_model::{self, Column, RowView, COLUMNS};

#[component]
pub fn TrainTable(records: RwSignal<Vec<TrainRecord>>, controller: ControllerHandle) -> impl IntoView {
    let add_record = move |_| controller.spawn(|c| async move { c.add_record().await });
    let clear_all = move |_| controller.spawn(|c| async move { c.clear_all().await });

    view! {
        <section class="train-section">
            <div class="table-actions">
                <button id="btn-adicionar-trem" class="btn btn-primary" on:click=add_record>
                    "Adicionar Trem"
                </button>
                <button id="btn-limpar-dados" class="btn btn-danger" on:click=clear_all>
                    "Limpar Dados"
                </button>
            </div>

            <div class="table-wrapper">
                <table class="train-table">
                    <thead>
                        <tr>
                            {COLUMNS.iter().map(|c| view! { <th>{c.header()}</th> }).collect::<Vec<_>>()}
                        </tr>
                    </thead>
                    <tbody id="tbody-trens">
                        {move || {
                            view_model::rows(&records.get())
                                .into_iter()
                                .map(|row| view! { <TrainRow row=row controller=controller /> })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </div>
        </section>
    }
}

#[component]
fn TrainRow(row: RowView, controller: ControllerHandle) -> impl IntoView {
    let index = row.index;
    let number = row.number.clone();

    let cells = COLUMNS
        .iter()
        .map(|column| match *column {
            Column::Position => view! { <td class="cell-position">{row.position()}</td> }.into_any(),
            Column::Field(field) => {
                let value = row.value(field).to_string();
                view! { <FieldCell index=index field=field value=value controller=controller /> }.into_any()
            }
            Column::DepartureStatus => {
                view! { <StatusBadge cell=row.departure_status.clone() /> }.into_any()
            }
            Column::ArrivalStatus => {
                view! { <StatusBadge cell=row.arrival_status.clone() /> }.into_any()
            }
            Column::Actions => {
                let remove = move |_| controller.spawn(move |c| async move { c.remove_record(index).await });
                view! {
                    <td>
                        <button class="btn btn-danger" on:click=remove>"Remover"</button>
                    </td>
                }
                .into_any()
            }
        })
        .collect::<Vec<_>>();

    view! { <tr data-numero=number>{cells}</tr> }
}

/// One inline-editable cell. Changes are committed on `change`, as the
/// browser fires it when the input loses focus.
#[component]
fn FieldCell(index: usize, field: RecordField, value: String, controller: ControllerHandle) -> impl IntoView {
    let commit = move |new_value: String| {
        controller.spawn(move |c| async move { c.update_field(index, field, new_value).await });
    };

    if field == RecordField::Notes {
        return view! {
            <td>
                <textarea
                    class="cell-notes"
                    prop:value=value
                    on:change=move |ev| commit(event_target_value(&ev))
                ></textarea>
            </td>
        }
        .into_any();
    }

    let input_type = if field.is_time() { "time" } else { "text" };
    view! {
        <td>
            <input
                type=input_type
                class="cell-input"
                data-field=field.key()
                value=value
                on:change=move |ev| commit(event_target_value(&ev))
            />
        </td>
    }
    .into_any()
}
