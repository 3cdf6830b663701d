//! Scripted interactions: a compact text form for driving a page from the
//! command line.
//!
//! Steps are `verb:argument` pairs:
//!
//! - `click:<id>`, `focus:<id>`
//! - `key:<key>`, where keys are named (`Tab`, `Esc`, `Enter`, `Up`, ...),
//!   single characters, or either prefixed with `Shift+`, `Ctrl+` or `Meta+`
//! - `type:<text>`, `paste:<text>`
//! - `scroll:<y>`, `resize:<width>x<height>`
//! - `wait:<ms>`

use std::{fmt, str::FromStr};

use anyhow::{Context as _, Result, anyhow, bail};
use frond::{
    event::key::{Ctrl, Empty, Key, KeyCode, Meta, Mods, Shift},
    testing::Harness,
};
use tracing::debug;

/// One scripted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Click the element with this id.
    Click(String),
    /// Focus the element with this id.
    Focus(String),
    /// Press a key on the focused element.
    Key(Key),
    /// Type text into the focused element.
    Type(String),
    /// Paste text into the focused element.
    Paste(String),
    /// Scroll the window.
    Scroll(f64),
    /// Resize the viewport.
    Resize(f64, f64),
    /// Let time pass.
    Wait(u64),
}

/// Parse a key name with optional modifier prefixes.
pub fn parse_key(s: &str) -> Result<Key> {
    let mut mods: Mods = Empty;
    let mut rest = s;
    loop {
        let (m, tail) = match rest.split_once('+') {
            Some(("Shift", t)) => (Shift, t),
            Some(("Ctrl", t)) => (Ctrl, t),
            Some(("Meta", t)) => (Meta, t),
            _ => break,
        };
        mods = mods + m;
        rest = tail;
    }
    let code = match rest {
        "Tab" => KeyCode::Tab,
        "Esc" | "Escape" => KeyCode::Esc,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Char(' '),
        "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => bail!("unknown key: {s}"),
            }
        }
    };
    Ok(mods + code)
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (verb, arg) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected verb:argument, got {s:?}"))?;
        Ok(match verb {
            "click" => Self::Click(arg.into()),
            "focus" => Self::Focus(arg.into()),
            "key" => Self::Key(parse_key(arg)?),
            "type" => Self::Type(arg.into()),
            "paste" => Self::Paste(arg.into()),
            "scroll" => Self::Scroll(arg.parse().context("scroll offset")?),
            "resize" => {
                let (w, h) = arg
                    .split_once('x')
                    .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {arg:?}"))?;
                Self::Resize(w.parse().context("width")?, h.parse().context("height")?)
            }
            "wait" => Self::Wait(arg.parse().context("milliseconds")?),
            _ => bail!("unknown step: {verb}"),
        })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click(id) => write!(f, "click #{id}"),
            Self::Focus(id) => write!(f, "focus #{id}"),
            Self::Key(k) => write!(f, "key {k:?}"),
            Self::Type(t) => write!(f, "type {t:?}"),
            Self::Paste(t) => write!(f, "paste {t:?}"),
            Self::Scroll(y) => write!(f, "scroll to {y}"),
            Self::Resize(w, h) => write!(f, "resize to {w}x{h}"),
            Self::Wait(ms) => write!(f, "wait {ms}ms"),
        }
    }
}

impl Step {
    /// Apply the step to a page.
    pub fn apply(&self, h: &mut Harness) -> Result<()> {
        debug!(step = %self, "step");
        match self {
            Self::Click(id) => h.click(id)?,
            Self::Focus(id) => {
                if !h.focus(id)? {
                    bail!("#{id} cannot take focus");
                }
            }
            Self::Key(k) => h.key(*k)?,
            Self::Type(t) => h.type_text(t)?,
            Self::Paste(t) => h.paste(t)?,
            Self::Scroll(y) => h.scroll_window(*y)?,
            Self::Resize(w, ht) => h.resize(*w, *ht)?,
            Self::Wait(ms) => h.advance(*ms)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_steps() -> Result<()> {
        assert_eq!("click:open".parse::<Step>()?, Step::Click("open".into()));
        assert_eq!("key:Shift+Tab".parse::<Step>()?, Step::Key(Shift + KeyCode::Tab));
        assert_eq!("key:Ctrl+Down".parse::<Step>()?, Step::Key(Ctrl + KeyCode::Down));
        assert_eq!("key:a".parse::<Step>()?, Step::Key('a'.into()));
        assert_eq!("type:soda ash".parse::<Step>()?, Step::Type("soda ash".into()));
        assert_eq!("resize:375x800".parse::<Step>()?, Step::Resize(375.0, 800.0));
        assert_eq!("wait:250".parse::<Step>()?, Step::Wait(250));
        assert!("key:Hyper".parse::<Step>().is_err());
        assert!("jump:3".parse::<Step>().is_err());
        assert!("click".parse::<Step>().is_err());
        Ok(())
    }
}
