use dioxus::prelude::*;

use crate::frames::use_frames;

const SAMPLE_PROJECTS: [(&str, &str); 3] = [
    ("8c1f3a", "P-2024-001 Rénovation toiture"),
    ("a41d07", "P-2024-014 Isolation combles"),
    ("f09b22", "P-2024-027 Pompe à chaleur"),
];

/// Demo page: opens project detail frames from a free-form id or from a list
/// row, the way back-office pages call into the frame manager.
#[component]
pub fn OpenProjectForm() -> Element {
    let frames = use_frames();
    let mut entity_id = use_signal(String::new);
    let mut label = use_signal(String::new);

    let submit = move |e: FormEvent| {
        e.prevent_default();
        let id = entity_id.read().trim().to_string();
        if id.is_empty() {
            return;
        }
        let label_value = label.read().trim().to_string();
        let label_value = (!label_value.is_empty()).then_some(label_value);
        frames.open(&id, label_value.as_deref());
        entity_id.set(String::new());
        label.set(String::new());
    };

    rsx! {
        div {
            class: "project-launcher",
            style: "max-width: 640px; margin: 2rem auto; font-family: system-ui, sans-serif; display: flex; flex-direction: column; gap: 1.5rem;",

            form {
                style: "display: flex; gap: 0.5rem;",
                onsubmit: submit,
                input {
                    r#type: "text",
                    placeholder: "Project id",
                    value: "{entity_id}",
                    oninput: move |e| entity_id.set(e.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Label (optional)",
                    value: "{label}",
                    oninput: move |e| label.set(e.value()),
                }
                button { r#type: "submit", "Open" }
            }

            table {
                style: "width: 100%; border-collapse: collapse;",
                tbody {
                    for (id, name) in SAMPLE_PROJECTS {
                        tr {
                            key: "{id}",
                            td { style: "padding: 0.5rem 0;", "{name}" }
                            td {
                                style: "text-align: right;",
                                button {
                                    onclick: move |_| frames.open(id, Some(name)),
                                    "View project"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
