//! Plain terminal rendering of a [`View`].

use inline_colorization::{color_cyan, color_red, color_reset, color_yellow, style_bold, style_reset};

use super::display::View;
use crate::utils::text::{sanitize_for_terminal, strip_markup};

pub const LOADING_MESSAGE: &str = "Loading Ayah......";
pub const FAILURE_MESSAGE: &str = "Failed to load Ayah. Please try again.";

pub fn render(view: &View) -> String {
    match view {
        View::Loading => format!("{color_cyan}{LOADING_MESSAGE}{color_reset}\n"),
        View::Failed => format!(
            "{style_bold}Ayah of the Day{style_reset}\n\n{color_red}{FAILURE_MESSAGE}{color_reset}\n\n{}\n",
            controls(false, false, false)
        ),
        View::Ayah(ayah) => {
            let text = sanitize_for_terminal(&ayah.text);
            let translation = sanitize_for_terminal(&strip_markup(&ayah.translation));
            let key = sanitize_for_terminal(&ayah.verse_key);
            format!(
                "{style_bold}Ayah of the Day{style_reset}\n\n{text}\n\n{translation}\n{color_cyan}— {key}{color_reset}\n\n{}\n",
                controls(ayah.audio_enabled, ayah.is_playing, ayah.is_loading)
            )
        }
    }
}

fn controls(audio_enabled: bool, is_playing: bool, is_loading: bool) -> String {
    let audio = match (audio_enabled, is_playing) {
        (false, _) => "    (recitation unavailable)".to_string(),
        (true, true) => format!("[p] {color_yellow}Pause Recitation{color_reset}"),
        (true, false) => "[p] Listen to Recitation".to_string(),
    };
    let fetch = if is_loading {
        "    Fetching...".to_string()
    } else {
        "[r] Refetch Ayah".to_string()
    };
    format!("{audio}   {fetch}   [q] Quit")
}
