//! Native browser dialogs: the presentation side of confirmation-gated actions.

use crate::app::Decision;

/// Ask the user to confirm. No window, or a blocked dialog, counts as a decline.
pub(crate) fn confirm(prompt: &str) -> Decision {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(prompt).ok())
        .unwrap_or(false)
        .into()
}

pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
