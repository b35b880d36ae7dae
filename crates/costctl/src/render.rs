//! Plain-text rendering of a bound screen.

use settings_engine::{ControlState, Display, Screen, SectionState, TelephonyState, View};

/// Width of the key column.
const KEY_WIDTH: usize = 22;

/// One line per control, then one per section, the telephony counters, and the open dialog
/// if any.
pub fn screen(screen: &Screen) -> String {
    let mut lines: Vec<String> = screen
        .controls()
        .iter()
        .map(|c| format!("{:<KEY_WIDTH$}{}{}", c.key, display(&c.display), flags(c)))
        .collect();
    let sections = screen.sections();
    if !sections.is_empty() {
        lines.push(String::new());
    }
    lines.extend(sections.iter().map(section));
    if let Some(t) = screen.telephony() {
        lines.push(String::new());
        lines.extend(telephony(&t));
    }
    match screen.current_view() {
        Some(View::ChoiceDialog(key)) => {
            lines.push(String::new());
            lines.push(format!("dialog open: {key}"));
        }
        Some(View::ResetConfirmation) => {
            lines.push(String::new());
            lines.push("dialog open: reset telephony counters?".to_string());
        }
        None => {}
    }
    lines.iter().map(|l| format!("{l}\n")).collect()
}

/// Text for what a control shows.
fn display(d: &Display) -> String {
    match d {
        Display::Unrendered => "-".to_string(),
        Display::Choice { selected, label } if selected == label => selected.clone(),
        Display::Choice { selected, label } => format!("{label} ({selected})"),
        Display::Toggle(true) => "on".to_string(),
        Display::Toggle(false) => "off".to_string(),
        Display::Field(text) if text.is_empty() => "\"\"".to_string(),
        Display::Field(text) => text.clone(),
    }
}

/// Section visibility and the entries it lists.
fn section(s: &SectionState) -> String {
    let state = if s.hidden { "hidden" } else { "shown" };
    let head = format!("{:<KEY_WIDTH$}{state}", format!("[{}]", s.id));
    if s.entries.is_empty() {
        head
    } else {
        format!("{head}  {}", s.entries.join(", "))
    }
}

/// Counter lines.
fn telephony(t: &TelephonyState) -> [String; 3] {
    let since = t
        .last_reset
        .map_or_else(|| "never".to_string(), |ms| format!("{ms} ms since epoch"));
    [
        format!("{:<KEY_WIDTH$}{} min", "calltime", t.call_minutes),
        format!("{:<KEY_WIDTH$}{}", "smscount", t.sms_count),
        format!("{:<KEY_WIDTH$}{since}", "last reset"),
    ]
}

/// Disabled/hidden markers.
fn flags(c: &ControlState) -> String {
    let mut f = String::new();
    if c.disabled {
        f.push_str("  [disabled]");
    }
    if c.hidden {
        f.push_str("  [hidden]");
    }
    f
}
