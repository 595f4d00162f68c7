use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {ModalHeader, div, "mb-3 space-y-1 pr-6"}
    clx! {ModalTitle, h3, "text-sm font-medium"}
    clx! {ModalDescription, p, "text-xs text-muted-foreground"}
    clx! {ModalBody, div, "flex flex-col gap-3"}
    clx! {ModalFooter, footer, "flex items-center justify-end gap-2 pt-2"}
}

pub use components::*;

/// Backdrop plus panel. Closing (× button, backdrop click) is reported through
/// `on_close`; whether the modal is mounted at all is up to the caller.
#[component]
pub fn Modal(
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] class: String,
    #[prop(default = "Modal")] data_name: &'static str,
    children: Children,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg",
        class
    );

    let on_backdrop = move |ev: web_sys::MouseEvent| {
        // Only clicks on the backdrop itself, not bubbled from the panel.
        if ev.target() == ev.current_target() {
            on_close.run(());
        }
    };

    view! {
        <div
            data-name=format!("{data_name}Backdrop")
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4"
            on:click=on_backdrop
        >
            <div data-name=data_name role="dialog" aria-modal="true" class=merged_class>
                <button
                    type="button"
                    class="absolute top-3 right-3 rounded-sm p-1 text-muted-foreground hover:text-foreground focus:ring-2 focus:ring-ring focus:outline-none [&_svg:not([class*='size-'])]:size-4"
                    aria-label="Close dialog"
                    on:click=move |_| on_close.run(())
                >
                    <X />
                </button>
                {children()}
            </div>
        </div>
    }
}
