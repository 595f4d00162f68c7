use std::sync::atomic::{AtomicU64, Ordering};

/// Form field a validation tooltip is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum TooltipAnchor {
    CategoryTitle,
    LinkUrl,
    LinkUpload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldTooltip {
    pub anchor: TooltipAnchor,
    pub message: String,
    /// Distinguishes successive tooltips so a delayed dismissal only removes
    /// the one it was scheduled for.
    pub serial: u64,
}

static SERIAL: AtomicU64 = AtomicU64::new(1);

/// Place a tooltip unless one is already showing; a second failure never
/// replaces or queues behind the first.
pub(crate) fn offer_tooltip(
    slot: &mut Option<FieldTooltip>,
    anchor: TooltipAnchor,
    message: impl Into<String>,
) -> Option<u64> {
    if slot.is_some() {
        return None;
    }
    let serial = SERIAL.fetch_add(1, Ordering::SeqCst);
    *slot = Some(FieldTooltip {
        anchor,
        message: message.into(),
        serial,
    });
    Some(serial)
}

/// Clear the tooltip only if it is still the one identified by `serial`.
pub(crate) fn dismiss_serial(slot: &mut Option<FieldTooltip>, serial: u64) -> bool {
    if slot.as_ref().is_some_and(|t| t.serial == serial) {
        *slot = None;
        true
    } else {
        false
    }
}
