//! Scripted screen interactions for the `run` subcommand.

use std::{
    result,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use settings_engine::Screen;
use settings_store::Value;
use tracing::info;

use crate::error::Result;

/// One user interaction or direct store write.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `set:KEY=VALUE`: write straight to the store, bypassing controls.
    Set(String, Value),
    /// `toggle:KEY=on|off`
    Toggle(String, bool),
    /// `open:KEY`: open a choice dialog.
    Open(String),
    /// `choose:KEY=OPTION`: confirm an option in the open dialog.
    Choose(String, String),
    /// `cancel:KEY`: dismiss the open dialog.
    Cancel(String),
    /// `edit:KEY=TEXT`: commit field text.
    Edit(String, String),
    /// `locale:LANG`: switch label locale.
    Locale(String),
    /// `reset:request|confirm|cancel`: drive the telephony reset dialog.
    Reset(ResetStep),
}

/// Step of the telephony counter reset dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Open the confirmation dialog.
    Request,
    /// Confirm and reset.
    Confirm,
    /// Dismiss the dialog.
    Cancel,
}

/// Split `KEY=VALUE`, requiring a non-empty key.
fn key_value<'a>(verb: &str, arg: &'a str) -> result::Result<(&'a str, &'a str), String> {
    match arg.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k, v)),
        _ => Err(format!("'{verb}' expects KEY=VALUE, got '{arg}'")),
    }
}

/// Parse a `set` value as JSON, falling back to plain text.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw))
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        let (verb, arg) = s
            .split_once(':')
            .ok_or_else(|| format!("expected VERB:ARGS, got '{s}'"))?;
        if arg.is_empty() {
            return Err(format!("'{verb}' needs an argument"));
        }
        match verb {
            "set" => {
                let (k, v) = key_value(verb, arg)?;
                Ok(Self::Set(k.into(), parse_value(v)))
            }
            "toggle" => {
                let (k, v) = key_value(verb, arg)?;
                let checked = match v {
                    "on" | "true" => true,
                    "off" | "false" => false,
                    _ => return Err(format!("toggle value must be on or off, got '{v}'")),
                };
                Ok(Self::Toggle(k.into(), checked))
            }
            "open" => Ok(Self::Open(arg.into())),
            "choose" => {
                let (k, v) = key_value(verb, arg)?;
                Ok(Self::Choose(k.into(), v.into()))
            }
            "cancel" => Ok(Self::Cancel(arg.into())),
            "edit" => {
                let (k, v) = key_value(verb, arg)?;
                Ok(Self::Edit(k.into(), v.into()))
            }
            "locale" => Ok(Self::Locale(arg.into())),
            "reset" => match arg {
                "request" => Ok(Self::Reset(ResetStep::Request)),
                "confirm" => Ok(Self::Reset(ResetStep::Confirm)),
                "cancel" => Ok(Self::Reset(ResetStep::Cancel)),
                _ => Err(format!("reset step must be request, confirm or cancel, got '{arg}'")),
            },
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// Apply one action to `screen`.
pub fn apply(screen: &mut Screen, action: &Action) -> Result<()> {
    info!(action = ?action, "apply_action");
    match action {
        Action::Set(key, value) => screen.store().set(key, value.clone()),
        Action::Toggle(key, checked) => screen.toggle(key, *checked)?,
        Action::Open(key) => screen.open_choice(key)?,
        Action::Choose(key, option) => screen.confirm_choice(key, option)?,
        Action::Cancel(key) => screen.cancel_choice(key)?,
        Action::Edit(key, text) => screen.edit(key, text)?,
        Action::Locale(lang) => screen.relocalize(lang),
        Action::Reset(ResetStep::Request) => screen.request_reset()?,
        Action::Reset(ResetStep::Confirm) => screen.confirm_reset(now_ms())?,
        Action::Reset(ResetStep::Cancel) => screen.cancel_reset()?,
    }
    Ok(())
}

/// Wall-clock time in milliseconds since the epoch.
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
}
