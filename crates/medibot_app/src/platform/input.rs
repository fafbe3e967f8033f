use engine_logging::engine_debug;
use medibot_core::{AppViewModel, KeyInput, Msg};

const LINE_CONTINUATION: char = '\\';

/// Translates one stdin line into the messages a textarea would produce.
///
/// The line is appended to the current draft. A trailing `\` stands for
/// Shift+Enter and keeps the newline in the draft; any other line ends with a
/// plain Enter. Text typed while the input is read-only is discarded.
pub fn line_to_msgs(view: &AppViewModel, line: &str) -> Vec<Msg> {
    match line.trim() {
        "/quit" => return vec![Msg::SessionClosed],
        "/voice" => return vec![Msg::VoiceClicked],
        "/stop" => return vec![Msg::StopVoiceClicked],
        _ => {}
    }

    if view.input_read_only {
        engine_debug!("Input is read-only, dropping line chars={}", line.chars().count());
        return Vec::new();
    }

    let draft = &view.draft;

    match line.strip_suffix(LINE_CONTINUATION) {
        Some(text) => vec![
            Msg::DraftChanged(format!("{draft}{text}\n")),
            Msg::KeyPressed(KeyInput::shift_enter()),
        ],
        None => vec![
            Msg::DraftChanged(format!("{draft}{line}")),
            Msg::KeyPressed(KeyInput::enter()),
        ],
    }
}
