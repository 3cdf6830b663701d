//! Blur-time validation for free text and pincode fields.

use crate::{Context, EventOutcome, NodeId, Result, Widget, error::Error, event::Event};

use super::{
    sanitize::rewrite,
    text::{HAS_VALUE, IS_INVALID},
};

/// Why a value failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    /// Shorter than `minlength`.
    TooShort,
    /// Longer than `maxlength`.
    TooLong,
    /// Empty but required.
    Required,
    /// Not in an acceptable format.
    Format,
}

impl Invalid {
    /// The error element attribute holding the message for this failure.
    pub fn message_attr(self) -> &'static str {
        match self {
            Self::TooShort => "data-min",
            Self::TooLong => "data-max",
            Self::Required | Self::Format => "data-required",
        }
    }
}

/// Check a trimmed value against length limits. Length failures take
/// precedence over the required check, and only apply to non-empty values.
pub fn check_length(
    value: &str,
    required: bool,
    min: Option<usize>,
    max: Option<usize>,
) -> Option<Invalid> {
    let len = value.chars().count();
    if value.is_empty() {
        return required.then_some(Invalid::Required);
    }
    if min.is_some_and(|m| len < m) {
        Some(Invalid::TooShort)
    } else if max.is_some_and(|m| len > m) {
        Some(Invalid::TooLong)
    } else {
        None
    }
}

/// Check a pincode: length limits, then no leading zero.
pub fn check_pincode(
    value: &str,
    required: bool,
    min: Option<usize>,
    max: Option<usize>,
) -> Option<Invalid> {
    check_length(value, required, min, max)
        .or_else(|| value.starts_with('0').then_some(Invalid::Format))
}

/// Which rules a field follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Free text with length limits.
    Text,
    /// Alphanumeric pincode with length limits and no leading zero.
    Pincode,
}

/// A field inside an `.m-input-text` container, validated when it loses
/// focus.
#[derive(Debug)]
pub struct Validated {
    /// Rules.
    kind: ValidationKind,
    /// Container carrying the state classes.
    container: NodeId,
    /// Message element.
    error: NodeId,
    /// Is a value required?
    required: bool,
}

impl Validated {
    /// Bind to the root field.
    pub fn new(ctx: &mut Context, kind: ValidationKind) -> Result<Self> {
        let root = ctx.root();
        let container = ctx
            .doc()
            .closest(root, ".m-input-text")?
            .ok_or_else(|| Error::missing("validated-input", ".m-input-text"))?;
        let error = ctx.require_in(container, ".m-input-text__error")?;
        Ok(Self {
            kind,
            container,
            error,
            required: ctx.doc().has_attr(root, "required"),
        })
    }

    /// Length limit from an attribute; absent or negative means no limit.
    fn limit(ctx: &Context, name: &str) -> Option<usize> {
        ctx.doc()
            .attr_f64(ctx.root(), name)
            .filter(|v| *v >= 0.0)
            .map(|v| v as usize)
    }

    /// Current failure, if any.
    pub fn check(&self, ctx: &Context) -> Option<Invalid> {
        let value = ctx.doc().value(ctx.root()).trim();
        let min = Self::limit(ctx, "minlength");
        let max = Self::limit(ctx, "maxlength");
        match self.kind {
            ValidationKind::Text => check_length(value, self.required, min, max),
            ValidationKind::Pincode => check_pincode(value, self.required, min, max),
        }
    }

    /// Mark the container and pick the message.
    pub fn validate(&self, ctx: &mut Context) -> Result<bool> {
        let failure = self.check(ctx);
        let filled = !ctx.doc().value(ctx.root()).trim().is_empty();
        let attr = failure.map_or("data-required", Invalid::message_attr);
        let message = ctx.doc().attr(self.error, attr).unwrap_or_default().to_string();
        let doc = ctx.doc_mut();
        doc.toggle_class(self.container, IS_INVALID, failure.is_some())?;
        if self.kind == ValidationKind::Text {
            doc.toggle_class(self.container, HAS_VALUE, filled)?;
        }
        doc.set_text(self.error, message)?;
        Ok(failure.is_none())
    }
}

impl Widget for Validated {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        match event {
            Event::Input(t) if *t == root && self.kind == ValidationKind::Pincode => {
                rewrite(ctx, root, |v| v.chars().filter(char::is_ascii_alphanumeric).collect())?;
            }
            Event::Blur(t) if *t == root => {
                self.validate(ctx)?;
            }
            _ => {}
        }
        Ok(EventOutcome::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_precedence() {
        assert_eq!(check_length("", true, Some(3), Some(5)), Some(Invalid::Required));
        assert_eq!(check_length("", false, Some(3), None), None);
        assert_eq!(check_length("ab", true, Some(3), Some(1)), Some(Invalid::TooShort));
        assert_eq!(check_length("abcdef", false, None, Some(5)), Some(Invalid::TooLong));
        assert_eq!(check_length("abcdef", false, None, None), None);
        assert_eq!(Invalid::TooShort.message_attr(), "data-min");
    }

    #[test]
    fn pincodes() {
        assert_eq!(check_pincode("400001", true, Some(6), Some(6)), None);
        assert_eq!(check_pincode("040001", true, Some(6), Some(6)), Some(Invalid::Format));
        assert_eq!(check_pincode("4000", true, Some(6), Some(6)), Some(Invalid::TooShort));
    }
}
