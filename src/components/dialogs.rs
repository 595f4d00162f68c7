use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::SubmitEvent;

use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, FieldTip, Input, Label, Modal, ModalBody, ModalDescription,
    ModalFooter, ModalHeader, ModalTitle,
};
use crate::forms::upload::read_as_data_uri;
use crate::forms::validation::check_image_mime;
use crate::forms::{
    confirm_delete, submit_category, submit_link, CategoryMode, DeleteTarget, IconChoice, LinkInput,
    LinkMode,
};
use crate::state::tooltip::TooltipAnchor;
use crate::state::{AppContext, DialogState};

/// Mounts whichever dialog the app state says is open.
#[component]
pub fn Dialogs() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    move || match state.dialog.get() {
        DialogState::Closed => ().into_any(),
        DialogState::Category(mode) => view! { <CategoryDialog mode=mode /> }.into_any(),
        DialogState::Link(mode) => view! { <LinkDialog mode=mode /> }.into_any(),
        DialogState::Prompt(target) => view! { <PromptDialog target=target /> }.into_any(),
    }
}

fn focus_on_mount(node: NodeRef<html::Input>) {
    Effect::new(move |_| {
        if let Some(el) = node.get() {
            let _ = el.focus();
        }
    });
}

#[component]
fn CategoryDialog(mode: CategoryMode) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let fields = state.fields;
    let heading = mode.heading();
    let mode = StoredValue::new(mode);

    let title_ref = NodeRef::<html::Input>::new();
    focus_on_mount(title_ref);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let title = fields.title.get_untracked();
        let result = mode.with_value(|m| state.try_commit(|b| submit_category(b, m, &title)));
        match result {
            Ok(_) => state.close_dialog(),
            Err(e) => {
                state.show_tooltip(&e);
            }
        }
    };

    view! {
        <Modal on_close=move |_| state.close_dialog() data_name="CategoryDialog">
            <form on:submit=on_submit>
                <ModalHeader>
                    <ModalTitle>{heading}</ModalTitle>
                </ModalHeader>
                <ModalBody>
                    <div class="space-y-1">
                        <Label html_for="category-title">"Title"</Label>
                        <Input
                            id="category-title"
                            bind_value=fields.title
                            node_ref=title_ref
                            on_edit=Callback::new(move |_| state.clear_tooltip())
                            class="h-8 text-sm"
                        />
                        <FieldTip anchor=TooltipAnchor::CategoryTitle tooltip=state.tooltip />
                    </div>
                </ModalBody>
                <ModalFooter>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:r#type="button"
                        on:click=move |_| state.close_dialog()
                    >
                        "Cancel"
                    </Button>
                    <Button size=ButtonSize::Sm attr:r#type="submit">
                        "Save"
                    </Button>
                </ModalFooter>
            </form>
        </Modal>
    }
}

#[component]
fn LinkDialog(mode: LinkMode) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let fields = state.fields;
    let heading = mode.heading();
    let mode = StoredValue::new(mode);

    let url_ref = NodeRef::<html::Input>::new();
    let file_ref = NodeRef::<html::Input>::new();
    focus_on_mount(url_ref);

    let clear_file_input = move || {
        if let Some(input) = file_ref.get_untracked() {
            input.set_value("");
        }
    };

    let on_file = move |ev: web_sys::Event| {
        state.clear_tooltip();
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|list| list.get(0)) else {
            return;
        };

        if let Err(e) = check_image_mime(&file.type_()) {
            input.set_value("");
            fields.icon.set(IconChoice::Site);
            if let Some(serial) = state.show_tooltip(&e) {
                let ms = state.config.with_value(|c| c.upload_tooltip_ms);
                state.dismiss_tooltip_after(serial, ms);
            }
            return;
        }

        let file_name = file.name();
        spawn_local(async move {
            match read_as_data_uri(&file).await {
                // The session may have ended while the file was being read.
                Ok(data_uri) if state.dialog.with_untracked(DialogState::is_open) => {
                    fields.icon.set(IconChoice::Upload { file_name, data_uri });
                }
                Ok(_) => {}
                Err(e) => log::warn!("could not read {file_name}: {e}"),
            }
        });
    };

    let use_site_icon = move |_: web_sys::MouseEvent| {
        clear_file_input();
        fields.icon.set(IconChoice::Site);
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let service = state.config.with_value(|c| c.favicon_service.clone());
        let name = fields.link_name.get_untracked();
        let url = fields.link_url.get_untracked();

        let result = fields.icon.with_untracked(|icon| {
            mode.with_value(|m| {
                state.try_commit(|b| {
                    let input = LinkInput {
                        name: &name,
                        url: &url,
                        icon,
                    };
                    submit_link(b, m, input, &service)
                })
            })
        });
        match result {
            Ok(_) => {
                clear_file_input();
                state.close_dialog();
            }
            Err(e) => {
                state.show_tooltip(&e);
            }
        }
    };

    let preview = move || fields.icon.with(|i| i.preview_src().map(str::to_string));
    let file_name = move || fields.icon.with(|i| i.file_name().map(str::to_string));

    view! {
        <Modal on_close=move |_| state.close_dialog() data_name="LinkDialog">
            <form on:submit=on_submit>
                <ModalHeader>
                    <ModalTitle>{heading}</ModalTitle>
                </ModalHeader>
                <ModalBody>
                    <div class="space-y-1">
                        <Label html_for="link-url">"URL"</Label>
                        <Input
                            id="link-url"
                            bind_value=fields.link_url
                            node_ref=url_ref
                            placeholder="example.com"
                            on_edit=Callback::new(move |_| state.clear_tooltip())
                            class="h-8 text-sm"
                        />
                        <FieldTip anchor=TooltipAnchor::LinkUrl tooltip=state.tooltip />
                    </div>

                    <div class="space-y-1">
                        <Label html_for="link-name">"Name"</Label>
                        <Input
                            id="link-name"
                            bind_value=fields.link_name
                            placeholder="Defaults to the site's host"
                            class="h-8 text-sm"
                        />
                    </div>

                    <div class="space-y-1">
                        <Label html_for="link-icon">"Icon"</Label>
                        <div class="flex items-center gap-2">
                            {move || {
                                preview()
                                    .map(|src| view! { <img src=src alt="" class="size-6 rounded-xs border border-border" /> })
                            }}
                            <input
                                id="link-icon"
                                type="file"
                                accept=".png,.jpg,.jpeg"
                                class="min-w-0 flex-1 text-xs file:mr-2 file:rounded-sm file:border file:border-border file:bg-transparent file:px-2 file:py-1"
                                node_ref=file_ref
                                on:change=on_file
                            />
                        </div>
                        {move || file_name().map(|n| view! { <p class="truncate text-xs text-muted-foreground">{n}</p> })}
                        <Show when=move || preview().is_some() fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                attr:r#type="button"
                                on:click=use_site_icon
                            >
                                "Use site icon"
                            </Button>
                        </Show>
                        <FieldTip anchor=TooltipAnchor::LinkUpload tooltip=state.tooltip />
                    </div>
                </ModalBody>
                <ModalFooter>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:r#type="button"
                        on:click=move |_| state.close_dialog()
                    >
                        "Cancel"
                    </Button>
                    <Button size=ButtonSize::Sm attr:r#type="submit">
                        "Save"
                    </Button>
                </ModalFooter>
            </form>
        </Modal>
    }
}

#[component]
fn PromptDialog(target: DeleteTarget) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let question = target.question();
    let warning = target.warning();
    let target = StoredValue::new(target);

    let on_yes = move |_: web_sys::MouseEvent| {
        target.with_value(|t| state.commit(|b| confirm_delete(b, t)));
        state.close_dialog();
    };

    view! {
        <Modal on_close=move |_| state.close_dialog() data_name="PromptDialog">
            <ModalHeader>
                <ModalTitle>{question}</ModalTitle>
                <ModalDescription>{warning}</ModalDescription>
            </ModalHeader>
            <ModalFooter>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| state.close_dialog()
                >
                    "No"
                </Button>
                <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_yes>
                    "Yes"
                </Button>
            </ModalFooter>
        </Modal>
    }
}
