use leptos::prelude::*;
use tw_merge::tw_merge;

use crate::state::tooltip::{FieldTooltip, TooltipAnchor};

/// Validation bubble rendered under a form field. Shows only while the shared
/// tooltip slot holds a tooltip for `anchor`.
#[component]
pub fn FieldTip(
    anchor: TooltipAnchor,
    tooltip: RwSignal<Option<FieldTooltip>>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let bubble_class = tw_merge!(
        "relative mt-2 w-fit rounded-sm px-2.5 py-1.5 text-xs whitespace-nowrap shadow-lg text-background bg-foreground/90",
        class
    );

    let message = move || {
        tooltip.with(|t| {
            t.as_ref()
                .filter(|t| t.anchor == anchor)
                .map(|t| t.message.clone())
        })
    };

    move || {
        message().map(|msg| {
            view! {
                <div data-name="FieldTip" data-anchor=anchor.as_ref().to_string() role="alert" class=bubble_class.clone()>
                    <div class="absolute -top-1 left-3 size-2 rotate-45 bg-foreground/90" />
                    <span class="relative">{msg}</span>
                </div>
            }
        })
    }
}
