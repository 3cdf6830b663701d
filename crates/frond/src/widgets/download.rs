//! Cross-origin download links, routed through the site's download proxy.

use tracing::debug;

use crate::{Context, EventOutcome, Result, Widget, event::Event, navigation::download_proxy_url};

/// Download interceptor bound to `body`.
#[derive(Debug, Default)]
pub struct DownloadInterceptor;

impl Widget for DownloadInterceptor {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let Event::Click(t) = event else {
            return Ok(EventOutcome::Ignore);
        };
        let doc = ctx.doc();
        let Some(link) = doc.closest(*t, "a[download]")? else {
            return Ok(EventOutcome::Ignore);
        };
        let Some(href) = doc.attr(link, "href") else {
            return Ok(EventOutcome::Ignore);
        };
        let cfg = &ctx.config().download;
        let proxied = download_proxy_url(
            doc.location(),
            href,
            doc.attr(link, "download"),
            &cfg.base_path,
            &cfg.proxy_path,
        )?;
        match proxied {
            Some(url) => {
                debug!(%url, "download proxied");
                ctx.navigate(url, true);
                Ok(EventOutcome::Prevent)
            }
            None => Ok(EventOutcome::Ignore),
        }
    }
}
