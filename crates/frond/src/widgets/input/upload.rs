//! File upload molecule: type and size checks with inline errors.

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    dom::FileInfo,
    event::Event,
};

use super::text::IS_INVALID;

/// Container class after a valid file was chosen.
const UPLOADED: &str = "is-uploaded";
/// Container class while a selection is being checked.
const UPLOADING: &str = "is-uploading";
/// Size limit when `data-limit` is absent, in megabytes.
const DEFAULT_LIMIT_MB: f64 = 10.0;

/// Does an `accept` list admit this file? Entries are MIME types, wildcard
/// families such as `image/*`, or extensions such as `.pdf`. An empty list
/// admits everything.
pub fn accepts(accept: &[String], file: &FileInfo) -> bool {
    if accept.is_empty() {
        return true;
    }
    let ext = file
        .name
        .rsplit_once('.')
        .map(|(_, e)| format!(".{}", e.to_ascii_lowercase()));
    accept.iter().any(|a| match a.strip_suffix("/*") {
        Some(family) => file.mime.starts_with(&format!("{family}/")),
        None => {
            a.eq_ignore_ascii_case(&file.mime)
                || ext.as_deref().is_some_and(|e| a.eq_ignore_ascii_case(e))
        }
    })
}

/// Why a chosen file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not in the `accept` list.
    Format,
    /// Over the size limit.
    TooLarge,
}

/// A `.m-input-upload` molecule.
#[derive(Debug)]
pub struct Upload {
    /// The file input.
    input: NodeId,
    /// Message element.
    error: NodeId,
    /// Clears the selection.
    remove: Option<NodeId>,
    /// Accepted types.
    accept: Vec<String>,
    /// Size limit in bytes.
    limit: u64,
}

impl Upload {
    /// Bind to the container.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let input = ctx.require(".m-input-upload__upload")?;
        let doc = ctx.doc();
        let accept = doc
            .attr(input, "accept")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let mb = doc.attr_f64(input, "data-limit").unwrap_or(DEFAULT_LIMIT_MB);
        Ok(Self {
            input,
            error: ctx.require(".m-input-upload__error")?,
            remove: ctx.query(".m-input-upload__button")?,
            accept,
            limit: (mb.max(0.0) * 1024.0 * 1024.0) as u64,
        })
    }

    /// Check a file against the accept list and size limit.
    pub fn check(&self, file: &FileInfo) -> Option<Rejection> {
        if !accepts(&self.accept, file) {
            Some(Rejection::Format)
        } else if file.size > self.limit {
            Some(Rejection::TooLarge)
        } else {
            None
        }
    }

    /// Validate the current selection and update the container.
    fn changed(&self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        let Some(file) = ctx.doc().files(self.input).first().cloned() else {
            ctx.doc_mut().remove_class(root, UPLOADED)?;
            return Ok(());
        };
        ctx.doc_mut().add_class(root, UPLOADING)?;
        let rejection = self.check(&file);
        let message = match rejection {
            Some(Rejection::Format) => ctx
                .doc()
                .attr(self.error, "data-format")
                .unwrap_or("Invalid file type.")
                .to_string(),
            Some(Rejection::TooLarge) => ctx
                .doc()
                .attr(self.error, "data-max")
                .unwrap_or("File size exceeds limit.")
                .to_string(),
            None => String::new(),
        };
        let doc = ctx.doc_mut();
        doc.toggle_class(root, IS_INVALID, rejection.is_some())?;
        doc.toggle_class(root, UPLOADED, rejection.is_none())?;
        doc.set_text(self.error, message)?;
        doc.remove_class(root, UPLOADING)
    }

    /// Drop the selection and every state class.
    pub fn reset(&mut self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        let doc = ctx.doc_mut();
        doc.set_files(self.input, vec![])?;
        doc.set_value(self.input, "")?;
        for class in [UPLOADING, UPLOADED, IS_INVALID] {
            doc.remove_class(root, class)?;
        }
        doc.set_text(self.error, "")
    }
}

impl Widget for Upload {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Change(t) if *t == self.input => self.changed(ctx)?,
            Event::Click(t) if self.remove.is_some_and(|r| ctx.doc().contains(r, *t)) => {
                self.reset(ctx)?;
                return Ok(EventOutcome::Prevent);
            }
            _ => {}
        }
        Ok(EventOutcome::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str, size: u64) -> FileInfo {
        FileInfo {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    #[test]
    fn accept_lists() {
        let list = vec!["image/*".to_string(), ".pdf".to_string(), "text/csv".to_string()];
        assert!(accepts(&list, &file("a.png", "image/png", 1)));
        assert!(accepts(&list, &file("A.PDF", "application/pdf", 1)));
        assert!(accepts(&list, &file("x.csv", "text/csv", 1)));
        assert!(!accepts(&list, &file("x.exe", "application/octet-stream", 1)));
        assert!(!accepts(&list, &file("imagex", "imagery/x", 1)));
        assert!(accepts(&[], &file("x.exe", "application/octet-stream", 1)));
    }
}
