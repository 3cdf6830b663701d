//! Range slider molecule: single or two-thumb sliders with linked text
//! fields, value outputs and a filled track.

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    dom::Document,
    event::Event,
    widget::{FILTER_CHANGE, FilterControl},
};

/// Container class for the two-thumb layout.
const TWO_THUMB: &str = "m-input-range--two-thumb";

/// Which thumb of a two-thumb slider moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumb {
    /// The lower bound.
    Low,
    /// The upper bound.
    High,
}

/// Keep two thumbs more than `gap` apart. The thumb that moved gives way.
pub fn clamp_thumbs(low: i64, high: i64, gap: i64, moved: Thumb) -> (i64, i64) {
    if high - low > gap {
        return (low, high);
    }
    match moved {
        Thumb::Low => (high - gap, high),
        Thumb::High => (low, low + gap),
    }
}

/// Group an integer's digits in threes: `1234567` becomes `1,234,567`.
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Leading integer value of a string, ignoring everything but digits.
/// Strings without digits read as zero.
pub fn parse_digits(s: &str) -> i64 {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// A range input's bounds and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slider {
    /// Lower bound.
    min: i64,
    /// Upper bound.
    max: i64,
    /// Current value, within bounds.
    value: i64,
}

impl Slider {
    /// Read a range input. Missing bounds default to 0 and 100, a missing
    /// value to the midpoint.
    fn read(doc: &Document, node: NodeId) -> Self {
        let min = doc.attr_f64(node, "min").map_or(0, |v| v as i64);
        let max = doc.attr_f64(node, "max").map_or(100, |v| v as i64).max(min);
        let value = doc
            .value(node)
            .trim()
            .parse::<f64>()
            .map_or(min + (max - min) / 2, |v| v as i64)
            .clamp(min, max);
        Self { min, max, value }
    }

    /// Position of the value along the track, in percent.
    fn percent(&self) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        100.0 * (self.value - self.min) as f64 / (self.max - self.min) as f64
    }
}

/// A `.m-input-range` molecule.
#[derive(Debug)]
pub struct Range {
    /// Range inputs, low thumb first.
    sliders: Vec<NodeId>,
    /// Text fields linked to sliders through `data-input`/`data-range`.
    fields: Vec<NodeId>,
    /// Track painted between two thumbs.
    track: Option<NodeId>,
    /// Two-thumb layout?
    two_thumb: bool,
    /// Minimum distance between two thumbs.
    gap: i64,
    /// Prefix for displayed values.
    currency: String,
    /// Values at connection, the unfiltered state.
    initial: Vec<i64>,
}

impl Range {
    /// Bind to the container.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let root = ctx.root();
        let sliders = ctx.query_all("input[type=range]")?;
        if sliders.is_empty() {
            return Err(crate::Error::missing("range", "input[type=range]"));
        }
        let two_thumb = ctx.doc().has_class(root, TWO_THUMB) && sliders.len() >= 2;
        Ok(Self {
            fields: ctx.query_all("[data-input]")?,
            track: ctx.query(".m-input-range__slider-track")?,
            two_thumb,
            gap: 1,
            currency: ctx.doc().attr(root, "data-currency").unwrap_or("₹").to_string(),
            initial: sliders.iter().map(|s| Slider::read(ctx.doc(), *s).value).collect(),
            sliders,
        })
    }

    /// Current slider values, low thumb first.
    pub fn current(&self, doc: &Document) -> Vec<i64> {
        self.sliders.iter().map(|s| Slider::read(doc, *s).value).collect()
    }

    /// Display form of a value.
    fn display(&self, v: i64) -> String {
        format!("{}{}", self.currency, group_digits(v))
    }

    /// The text field linked to a slider.
    fn field_for(&self, doc: &Document, slider: NodeId) -> Option<NodeId> {
        let key = doc.attr(slider, "data-range")?;
        self.fields
            .iter()
            .copied()
            .find(|f| doc.attr(*f, "data-input") == Some(key))
    }

    /// The slider linked to a text field.
    fn slider_for(&self, doc: &Document, field: NodeId) -> Option<NodeId> {
        let key = doc.attr(field, "data-input")?;
        self.sliders
            .iter()
            .copied()
            .find(|s| doc.attr(*s, "data-range") == Some(key))
    }

    /// Write a slider's value to its outputs and linked text field.
    fn update_output(&self, ctx: &mut Context, slider: NodeId) -> Result<()> {
        let text = self.display(Slider::read(ctx.doc(), slider).value);
        let outputs = match ctx.doc().attr(slider, "id") {
            Some(id) => ctx.query_all(&format!("[data-output='{id}']"))?,
            None => vec![],
        };
        let field = self.field_for(ctx.doc(), slider);
        let doc = ctx.doc_mut();
        for o in outputs {
            doc.set_text(o, text.clone())?;
        }
        if let Some(f) = field {
            doc.set_value(f, text)?;
        }
        Ok(())
    }

    /// Paint the filled portion of the track.
    fn fill(&self, ctx: &mut Context) -> Result<()> {
        if self.two_thumb {
            let Some(track) = self.track else {
                return Ok(());
            };
            let lo = Slider::read(ctx.doc(), self.sliders[0]);
            let hi = Slider::read(ctx.doc(), self.sliders[1]);
            let p1 = 100.0 * lo.value as f64 / lo.max.max(1) as f64;
            let p2 = 100.0 * hi.value as f64 / hi.max.max(1) as f64;
            ctx.doc_mut().set_style(
                track,
                "background",
                format!(
                    "linear-gradient(to right, var(--coolgrey) {p1}%, var(--grey-70) {p1}%, var(--grey-70) {p2}%, var(--coolgrey) {p2}%)"
                ),
            )
        } else if let [slider] = self.sliders[..] {
            let p = Slider::read(ctx.doc(), slider).percent();
            ctx.doc_mut().set_style(
                slider,
                "background",
                format!(
                    "linear-gradient(90deg, var(--grey-70) {p}%, var(--coolgrey) {}%)",
                    p + 0.1
                ),
            )
        } else {
            Ok(())
        }
    }

    /// Enforce the gap after a thumb moved.
    fn clamp(&self, ctx: &mut Context, moved: NodeId) -> Result<()> {
        if !self.two_thumb {
            return Ok(());
        }
        let (lo_node, hi_node) = (self.sliders[0], self.sliders[1]);
        let thumb = if moved == lo_node { Thumb::Low } else { Thumb::High };
        let lo = Slider::read(ctx.doc(), lo_node);
        let hi = Slider::read(ctx.doc(), hi_node);
        let (l, h) = clamp_thumbs(lo.value, hi.value, self.gap, thumb);
        let doc = ctx.doc_mut();
        if l != lo.value {
            doc.set_value(lo_node, l.clamp(lo.min, lo.max).to_string())?;
        }
        if h != hi.value {
            doc.set_value(hi_node, h.clamp(hi.min, hi.max).to_string())?;
        }
        Ok(())
    }

    /// Bring every derived display in line with the sliders.
    fn refresh(&self, ctx: &mut Context) -> Result<()> {
        for s in &self.sliders {
            self.update_output(ctx, *s)?;
        }
        self.fill(ctx)
    }

    /// A slider moved.
    fn slide(&self, ctx: &mut Context, slider: NodeId) -> Result<()> {
        self.clamp(ctx, slider)?;
        self.refresh(ctx)?;
        let root = ctx.root();
        ctx.emit(root, FILTER_CHANGE, "");
        Ok(())
    }

    /// A linked text field was edited: accept in-range numbers, otherwise
    /// restore the slider's value.
    fn text_input(&self, ctx: &mut Context, field: NodeId) -> Result<()> {
        let Some(slider) = self.slider_for(ctx.doc(), field) else {
            return Ok(());
        };
        let current = Slider::read(ctx.doc(), slider);
        let typed = parse_digits(ctx.doc().value(field));
        let value = if (current.min..=current.max).contains(&typed) {
            ctx.doc_mut().set_value(slider, typed.to_string())?;
            typed
        } else {
            current.value
        };
        self.slide(ctx, slider)?;
        let text = self.display(value);
        let doc = ctx.doc_mut();
        doc.set_value(field, text)?;
        doc.add_class(field, "has-value")
    }
}

impl Widget for Range {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.refresh(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        match event {
            Event::Input(t) if self.sliders.contains(t) => self.slide(ctx, *t)?,
            Event::Input(t) if self.fields.contains(t) => self.text_input(ctx, *t)?,
            Event::Focus(t) if self.sliders.contains(t) => {
                let doc = ctx.doc_mut();
                doc.add_class(*t, "has-focus")?;
                doc.add_class(root, "has-focus-within")?;
            }
            Event::Blur(t) if self.sliders.contains(t) => {
                let doc = ctx.doc_mut();
                doc.remove_class(*t, "has-focus")?;
                doc.remove_class(root, "has-focus-within")?;
            }
            _ => {}
        }
        Ok(EventOutcome::Ignore)
    }

    fn filter_control(&mut self) -> Option<&mut dyn FilterControl> {
        Some(self)
    }
}

impl FilterControl for Range {
    fn values(&self, doc: &Document) -> Vec<String> {
        let current = self.current(doc);
        if current == self.initial {
            return vec![];
        }
        current.into_iter().map(|v| v.to_string()).collect()
    }

    fn clear(&mut self, ctx: &mut Context) -> Result<()> {
        for (s, v) in self.sliders.iter().zip(&self.initial) {
            ctx.doc_mut().set_value(*s, v.to_string())?;
        }
        self.refresh(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbs_keep_their_gap() {
        assert_eq!(clamp_thumbs(20, 80, 1, Thumb::Low), (20, 80));
        assert_eq!(clamp_thumbs(99, 100, 1, Thumb::Low), (99, 100));
        assert_eq!(clamp_thumbs(100, 100, 1, Thumb::Low), (99, 100));
        assert_eq!(clamp_thumbs(40, 30, 1, Thumb::High), (40, 41));
    }

    #[test]
    fn digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
        assert_eq!(group_digits(-45000), "-45,000");
        assert_eq!(parse_digits("₹12,500"), 12500);
        assert_eq!(parse_digits("abc"), 0);
    }
}
