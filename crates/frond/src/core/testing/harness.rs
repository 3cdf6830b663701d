use std::time::Duration;

use url::Url;

use super::markup::El;
use crate::{
    NodeId, WidgetId,
    core::{config::Config, context::Context, dom::Document, dump, page::Page, storage::Storage},
    error::{Error, Result},
    event::key::Key,
    widget::Widget,
    widgets,
};

/// Installs widget definitions on a page.
type Definer = Box<dyn FnOnce(&mut Page) -> Result<()>>;

/// A page built from fixture markup, with helpers that address elements by
/// their `id` attribute. Every input settles the page before returning.
pub struct Harness {
    /// The page under test.
    pub page: Page,
}

/// Builder for creating a test harness with a fluent API.
pub struct HarnessBuilder {
    /// Children of `body`.
    body: Vec<El>,
    /// Page location.
    url: String,
    /// Viewport width and height.
    size: (f64, f64),
    /// Configuration.
    config: Config,
    /// Storage replacing the default in-memory store.
    storage: Option<Box<dyn Storage>>,
    /// Initial window scroll.
    scroll_y: f64,
    /// Definition installer.
    define: Definer,
}

impl HarnessBuilder {
    /// Start from body content.
    fn new(body: Vec<El>) -> Self {
        Self {
            body,
            url: "https://www.example.com/".into(),
            size: (1280.0, 800.0),
            config: Config::default(),
            storage: None,
            scroll_y: 0.0,
            define: Box::new(widgets::define_all),
        }
    }

    /// Set the page location.
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Set the viewport size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = (width, height);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use a specific storage backend.
    pub fn storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Scroll the window before widgets attach.
    pub fn scrolled(mut self, y: f64) -> Self {
        self.scroll_y = y;
        self
    }

    /// Install only the given definitions instead of the full set.
    pub fn define(mut self, f: impl FnOnce(&mut Page) -> Result<()> + 'static) -> Self {
        self.define = Box::new(f);
        self
    }

    /// Install a single definition.
    pub fn only<W, F>(self, label: &'static str, selector: &str, build: F) -> Self
    where
        W: Widget,
        F: Fn(&mut Context<'_>) -> Result<W> + Send + 'static,
    {
        let selector = selector.to_string();
        self.define(move |page| page.define(label, &selector, build))
    }

    /// Build the page and upgrade it.
    pub fn build(self) -> Result<Harness> {
        let mut doc = Document::new(Url::parse(&self.url)?, self.size.0, self.size.1);
        let body = doc.body();
        for e in &self.body {
            e.build(&mut doc, body)?;
        }
        doc.set_scroll_y(self.scroll_y);
        let mut page = Page::new(doc, self.config);
        if let Some(s) = self.storage {
            page.set_storage(s);
        }
        (self.define)(&mut page)?;
        page.upgrade()?;
        Ok(Harness { page })
    }
}

impl Harness {
    /// Create a harness builder for a page whose body holds `body`.
    pub fn builder(body: impl IntoIterator<Item = El>) -> HarnessBuilder {
        HarnessBuilder::new(body.into_iter().collect())
    }

    /// The document.
    pub fn doc(&self) -> &Document {
        self.page.doc()
    }

    /// Element with the given `id` attribute.
    pub fn id(&self, id: &str) -> Result<NodeId> {
        self.doc()
            .by_id(id)
            .ok_or_else(|| Error::Invalid(format!("no element #{id}")))
    }

    /// First element in the document matching a selector.
    pub fn q(&self, sel: &str) -> Result<NodeId> {
        self.doc()
            .query(self.doc().root(), sel)?
            .ok_or_else(|| Error::Invalid(format!("nothing matches {sel}")))
    }

    /// Every element in the document matching a selector.
    pub fn qa(&self, sel: &str) -> Result<Vec<NodeId>> {
        self.doc().query_all(self.doc().root(), sel)
    }

    /// Does the element `#id` have a class?
    pub fn has_class(&self, id: &str, class: &str) -> Result<bool> {
        Ok(self.doc().has_class(self.id(id)?, class))
    }

    /// Attribute of element `#id`.
    pub fn attr(&self, id: &str, name: &str) -> Result<Option<String>> {
        Ok(self.doc().attr(self.id(id)?, name).map(str::to_string))
    }

    /// Form value of element `#id`.
    pub fn value(&self, id: &str) -> Result<String> {
        Ok(self.doc().value(self.id(id)?).to_string())
    }

    /// Text of element `#id`.
    pub fn text(&self, id: &str) -> Result<String> {
        Ok(self.doc().text_content(self.id(id)?))
    }

    /// The `id` attribute of the focused element.
    pub fn focused(&self) -> Option<String> {
        let a = self.doc().active()?;
        self.doc().attr(a, "id").map(str::to_string)
    }

    /// Click the element `#id`.
    pub fn click(&mut self, id: &str) -> Result<()> {
        let n = self.id(id)?;
        self.page.click(n)
    }

    /// Click an element.
    pub fn click_node(&mut self, node: NodeId) -> Result<()> {
        self.page.click(node)
    }

    /// Press a key on the focused element.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<()> {
        self.page.key(key)
    }

    /// Press several keys.
    pub fn keys(&mut self, keys: impl IntoIterator<Item = Key>) -> Result<()> {
        for k in keys {
            self.page.key(k)?;
        }
        Ok(())
    }

    /// Type text into the focused element.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        self.page.type_text(text)
    }

    /// Paste into the focused element.
    pub fn paste(&mut self, text: &str) -> Result<()> {
        self.page.paste(text)
    }

    /// Focus the element `#id`.
    pub fn focus(&mut self, id: &str) -> Result<bool> {
        let n = self.id(id)?;
        self.page.focus(n)
    }

    /// Drop focus.
    pub fn blur(&mut self) -> Result<()> {
        self.page.blur()
    }

    /// Scroll the window.
    pub fn scroll_window(&mut self, y: f64) -> Result<()> {
        self.page.scroll_window(y)
    }

    /// Scroll the element `#id`.
    pub fn scroll_element(&mut self, id: &str, left: f64, top: f64) -> Result<()> {
        let n = self.id(id)?;
        self.page.scroll_element(n, left, top)
    }

    /// Resize the viewport. The resize broadcast happens after the debounce.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.page.resize(width, height)
    }

    /// Advance the page clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) -> Result<()> {
        self.page.advance(Duration::from_millis(ms))
    }

    /// Run a closure against a widget.
    pub fn with_widget<W, R>(
        &mut self,
        id: impl Into<WidgetId>,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        self.page.with_widget(id, f)
    }

    /// The widget of type `W` bound to element `#id`.
    pub fn widget<W: Widget>(&mut self, id: &str) -> Result<WidgetId> {
        let n = self.id(id)?;
        self.page
            .find_at::<W>(n)
            .map(WidgetId::from)
            .ok_or_else(|| Error::Invalid(format!("no widget on #{id}")))
    }

    /// A rendering of the whole document, for failure messages.
    pub fn dump(&self) -> String {
        dump::dump(self.doc(), self.doc().root()).unwrap_or_default()
    }
}
