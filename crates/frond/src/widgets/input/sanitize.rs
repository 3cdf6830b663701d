//! Character filters for free-text fields, and the widget that applies them
//! as the user types or pastes.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    event::{Event, key::Key},
};

/// Keycap sequences such as `1️⃣`.
static KEYCAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x23-\x39]\x{FE0F}?\x{20E3}").expect("keycap regex"));

/// Pictographic emoji.
static PICTOGRAPHIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Extended_Pictographic}").expect("pictographic regex"));

/// Emoji joiners, selectors, modifiers and tags. Digits, `*` and `#` are
/// emoji components too but are ordinary text on their own.
static COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Emoji_Component}--[0-9#*]]").expect("component regex"));

/// Runs of whitespace.
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("spaces regex"));

/// Remove emoji, keycap sequences and the joiners and modifiers that build
/// emoji sequences. Idempotent.
pub fn strip_emoji(s: &str) -> String {
    let s = KEYCAP.replace_all(s, "");
    let s = PICTOGRAPHIC.replace_all(&s, "");
    COMPONENT.replace_all(&s, "").into_owned()
}

/// Does the string contain anything [`strip_emoji`] would remove?
pub fn has_emoji(s: &str) -> bool {
    KEYCAP.is_match(s) || PICTOGRAPHIC.is_match(s) || COMPONENT.is_match(s)
}

/// Collapse every run of whitespace to a single space.
pub fn collapse_spaces(s: &str) -> String {
    SPACES.replace_all(s, " ").into_owned()
}

/// Keep ASCII letters, digits and whitespace.
pub fn alphanumeric_only(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Keep ASCII letters and spaces, with runs of spaces collapsed.
pub fn letters_only(s: &str) -> String {
    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();
    collapse_spaces(&kept)
}

/// Keep ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// How a field restricts its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeMode {
    /// Strip emoji; paste is filtered and truncated to the field's room.
    Emoji,
    /// Letters, digits and whitespace.
    Alphanumeric,
    /// Letters and single spaces.
    Letters,
    /// Digits; a pasted string with anything else is rejected outright.
    Digits,
}

impl SanitizeMode {
    /// The mode for an element, from its `input-sanitize` attribute or its
    /// `-allowOnly*` marker class.
    pub fn for_element(attr: Option<&str>, classes: &[String]) -> Self {
        let has = |c: &str| classes.iter().any(|k| k == c);
        match attr {
            Some("alphanumeric") => Self::Alphanumeric,
            Some("letters") => Self::Letters,
            Some("digits") => Self::Digits,
            Some(_) => Self::Emoji,
            None if has("-allowOnlyNumberText") => Self::Alphanumeric,
            None if has("-allowOnlyNumber") => Self::Digits,
            None if has("-allowOnlyText") => Self::Letters,
            None => Self::Emoji,
        }
    }

    /// Filter a value.
    pub fn apply(self, s: &str) -> String {
        match self {
            Self::Emoji => strip_emoji(s),
            Self::Alphanumeric => alphanumeric_only(s),
            Self::Letters => letters_only(s),
            Self::Digits => digits_only(s),
        }
    }

    /// May this character be typed?
    pub fn allows(self, c: char) -> bool {
        match self {
            Self::Emoji => !has_emoji(c.encode_utf8(&mut [0; 4])),
            Self::Alphanumeric => c.is_ascii_alphanumeric() || c.is_whitespace(),
            Self::Letters => c.is_ascii_alphabetic() || c == ' ',
            Self::Digits => c.is_ascii_digit() || c == '+',
        }
    }
}

/// Write a filtered value back into a field, keeping the caret after the
/// same logical character.
pub fn rewrite(ctx: &mut Context, field: NodeId, f: impl Fn(&str) -> String) -> Result<bool> {
    let doc = ctx.doc();
    let value = doc.value(field).to_string();
    let filtered = f(&value);
    if filtered == value {
        return Ok(false);
    }
    let (caret, _) = doc.selection(field);
    let before: String = value.chars().take(caret).collect();
    let caret = f(&before).chars().count().min(filtered.chars().count());
    let doc = ctx.doc_mut();
    doc.set_value(field, filtered)?;
    doc.set_selection(field, caret, caret)?;
    Ok(true)
}

/// Restricts what can be typed or pasted into a text field.
#[derive(Debug)]
pub struct Sanitizer {
    /// Active filter.
    mode: SanitizeMode,
}

impl Sanitizer {
    /// A sanitizer for the root field, with its mode read from the markup.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let el = ctx.doc().el(ctx.root())?;
        let mode = SanitizeMode::for_element(el.attr("input-sanitize"), el.classes());
        Ok(Self { mode })
    }

    /// The active filter.
    pub fn mode(&self) -> SanitizeMode {
        self.mode
    }

    /// Take over a paste: filter, truncate to the remaining room and splice
    /// at the selection.
    fn paste(&self, ctx: &mut Context, text: &str) -> Result<EventOutcome> {
        let field = ctx.root();
        if self.mode == SanitizeMode::Digits {
            return Ok(if text.chars().all(|c| c.is_ascii_digit()) {
                EventOutcome::Ignore
            } else {
                EventOutcome::Handle
            });
        }
        if self.mode != SanitizeMode::Emoji {
            return Ok(EventOutcome::Ignore);
        }
        let doc = ctx.doc();
        let mut clean = strip_emoji(text);
        if let Some(max) = doc.attr_f64(field, "maxlength") {
            let (start, end) = doc.selection(field);
            let len = doc.value(field).chars().count();
            let room = (max.max(0.0) as usize + (end - start)).saturating_sub(len);
            clean = clean.chars().take(room).collect();
        }
        let doc = ctx.doc_mut();
        doc.insert_text(field, &clean)?;
        doc.queue_event(Event::Input(field));
        Ok(EventOutcome::Handle)
    }

    /// Block keys the mode does not allow, and typing into a full field.
    fn key(&self, ctx: &Context, key: Key) -> EventOutcome {
        let Some(c) = key.printable() else {
            return EventOutcome::Ignore;
        };
        let field = ctx.root();
        let full = ctx
            .doc()
            .attr_f64(field, "maxlength")
            .is_some_and(|max| ctx.doc().value(field).chars().count() as f64 >= max);
        let (start, end) = ctx.doc().selection(field);
        if !self.mode.allows(c) || (full && start == end) {
            EventOutcome::Prevent
        } else {
            EventOutcome::Ignore
        }
    }
}

impl Widget for Sanitizer {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if event.target() != ctx.root() {
            return Ok(EventOutcome::Ignore);
        }
        match event {
            Event::Input(field) => {
                let mode = self.mode;
                if mode == SanitizeMode::Emoji {
                    rewrite(ctx, *field, |v| mode.apply(v.trim_start()))?;
                } else {
                    rewrite(ctx, *field, |v| mode.apply(v))?;
                }
                Ok(EventOutcome::Ignore)
            }
            Event::Key(_, key) => Ok(self.key(ctx, *key)),
            Event::Paste(_, text) => self.paste(ctx, text),
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_stripping() {
        assert_eq!(strip_emoji("salt 🧂 bag"), "salt  bag");
        assert_eq!(strip_emoji("call 1️⃣ now"), "call  now");
        assert_eq!(strip_emoji("family 👨‍👩‍👧 ok"), "family  ok");
        assert_eq!(strip_emoji("thumbs 👍🏽"), "thumbs ");
        assert_eq!(strip_emoji("flag 🇮🇳"), "flag ");
        assert_eq!(strip_emoji("#42 * 7"), "#42 * 7");
        assert_eq!(strip_emoji("plain text"), "plain text");
        assert!(has_emoji("a😀"));
        assert!(!has_emoji("a1#"));
    }

    #[test]
    fn modes() {
        assert_eq!(alphanumeric_only("ab-12 c!"), "ab12 c");
        assert_eq!(letters_only("Jo3hn  O'Neil"), "John ONeil");
        assert_eq!(digits_only("+91 98-76"), "919876");
        assert_eq!(collapse_spaces("a \t b\n\nc"), "a b c");
        assert!(SanitizeMode::Digits.allows('+'));
        assert!(!SanitizeMode::Letters.allows('1'));
        assert!(!SanitizeMode::Emoji.allows('😀'));
        assert!(SanitizeMode::Emoji.allows('é'));
    }

    #[test]
    fn mode_from_markup() {
        let classes = vec!["-allowOnlyNumber".to_string()];
        assert_eq!(SanitizeMode::for_element(None, &classes), SanitizeMode::Digits);
        assert_eq!(SanitizeMode::for_element(Some(""), &classes), SanitizeMode::Emoji);
        assert_eq!(SanitizeMode::for_element(Some("letters"), &[]), SanitizeMode::Letters);
        assert_eq!(SanitizeMode::for_element(None, &[]), SanitizeMode::Emoji);
    }
}
