use leptos::prelude::*;

use crate::browser::ControllerHandle;
use crate::model::{Holiday, ShiftInfo, ShiftPeriod};

#[component]
pub fn ShiftInfoForm(shift_info: RwSignal<ShiftInfo>, controller: ControllerHandle) -> impl IntoView {
    // Every field change persists the whole form
    let save = move || controller.spawn(|c| async move { c.save_shift_info().await });

    view! {
        <section class="shift-info">
            <div class="form-group">
                <label for="agente">"Agente"</label>
                <input
                    id="agente"
                    type="text"
                    class="input"
                    prop:value=move || shift_info.with(|i| i.agent.clone())
                    on:change=move |ev| {
                        shift_info.update(|i| i.agent = event_target_value(&ev));
                        save();
                    }
                />
            </div>

            <div class="form-group">
                <label for="dia">"Dia"</label>
                <input
                    id="dia"
                    type="date"
                    class="input"
                    prop:value=move || shift_info.with(|i| i.date.clone())
                    on:change=move |ev| {
                        shift_info.update(|i| i.date = event_target_value(&ev));
                        save();
                    }
                />
            </div>

            <div class="form-group">
                <label for="feriado">"Feriado"</label>
                <select
                    id="feriado"
                    class="input"
                    prop:value=move || shift_info.with(|i| i.holiday.as_str().to_string())
                    on:change=move |ev| {
                        let holiday = Holiday::from(event_target_value(&ev));
                        shift_info.update(|i| i.holiday = holiday);
                        save();
                    }
                >
                    {Holiday::ALL.iter().map(|h| {
                        let value = h.as_str().to_string();
                        view! { <option value=value.clone()>{value.clone()}</option> }
                    }).collect::<Vec<_>>()}
                    // keeps a value the server stored outside the known choices selectable
                    {move || shift_info.with(|i| match &i.holiday {
                        Holiday::Other(value) => {
                            Some(view! { <option value=value.clone()>{value.clone()}</option> })
                        }
                        _ => None,
                    })}
                </select>
            </div>

            <div class="form-group">
                <label for="turno">"Turno"</label>
                <select
                    id="turno"
                    class="input"
                    prop:value=move || shift_info.with(|i| i.shift.as_str().to_string())
                    on:change=move |ev| {
                        let shift = ShiftPeriod::from(event_target_value(&ev));
                        shift_info.update(|i| i.shift = shift);
                        save();
                    }
                >
                    {ShiftPeriod::ALL.iter().map(|s| {
                        let value = s.as_str().to_string();
                        view! { <option value=value.clone()>{value.clone()}</option> }
                    }).collect::<Vec<_>>()}
                    // keeps a value the server stored outside the known choices selectable
                    {move || shift_info.with(|i| match &i.shift {
                        ShiftPeriod::Other(value) => {
                            Some(view! { <option value=value.clone()>{value.clone()}</option> })
                        }
                        _ => None,
                    })}
                </select>
            </div>
        </section>
    }
}
