//! Built-in widgets and their default element bindings.
//!
//! Each module holds one widget family. [`define_all`] registers every family
//! against the markup it upgrades, in an order where widgets sharing a root
//! element see events in the intended sequence: character filters run
//! before the fields they protect, and filter controls before their panel.

/// Accordions.
pub mod accordion;
/// Breadcrumb trails.
pub mod breadcrumb;
/// Whole-card links.
pub mod card_link;
/// Download interception.
pub mod download;
/// Dropdown menus and selects.
pub mod dropdown;
/// Filter panels.
pub mod filter;
/// Site header.
pub mod header;
/// Form inputs.
pub mod input;
/// Modal dialogs.
pub mod modal;
/// Input modality tracking.
pub mod modality;
/// Scroll-triggered entrance animations.
pub mod motion;
/// Toasts and snackbars.
pub mod notify;
/// Shared overlay state.
pub mod overlay;
/// Pagination.
pub mod pagination;
/// Recently viewed products.
pub mod recent;
/// Custom scrollbars.
pub mod scrollbar;
/// In-page section navigation.
pub mod secondary_nav;
/// Skip-to-content links.
pub mod skip_link;
/// Card sliders and carousels.
pub mod slider;
/// Tab groups.
pub mod tabs;

pub use accordion::Accordion;
pub use breadcrumb::Breadcrumb;
pub use card_link::CardLink;
pub use download::DownloadInterceptor;
pub use dropdown::Dropdown;
pub use filter::FilterPanel;
pub use header::SiteHeader;
pub use input::{
    Checkbox, FilterField, PlaceholderSuggestions, Range, SanitizeMode, Sanitizer, TextArea,
    TextField, Upload, ValidationKind, Validated,
};
pub use modal::{Modal, ModalMarkup};
pub use modality::Modality;
pub use motion::Motion;
pub use notify::Notifier;
pub use overlay::{Overlay, OverlayState};
pub use pagination::Pagination;
pub use recent::RecentlyViewed;
pub use scrollbar::{Axis, Scrollbar};
pub use secondary_nav::SecondaryNav;
pub use skip_link::SkipLink;
pub use slider::{Slider, SliderMode};
pub use tabs::{SlidingTabs, Tabs};

use crate::{Page, Result};

/// Fields with a character filter: explicit modes, and text fields that
/// strip emoji unless they opt out. One definition, so a field matching
/// several of these still gets a single filter.
const SANITIZED: &str = "[input-sanitize], .-allowOnlyNumberText, .-allowOnlyNumber, \
     .-allowOnlyText, \
     [type=search]:not(.-allowEmoji), [type=text]:not(.-allowEmoji)";

/// Register every built-in widget with its default selector.
pub fn define_all(page: &mut Page) -> Result<()> {
    page.define("modality", "body", |_| Ok(Modality))?;
    page.define("notifier", "body", Notifier::new)?;
    page.define("download", "body", |_| Ok(DownloadInterceptor))?;

    page.define("sanitizer", SANITIZED, Sanitizer::new)?;
    page.define("textarea-validation", ".js-textareaInput", |ctx| {
        Validated::new(ctx, ValidationKind::Text)
    })?;
    page.define("pincode", ".js-pincodeInput", |ctx| {
        Validated::new(ctx, ValidationKind::Pincode)
    })?;
    page.define("text-field", ".m-text-input-field__input", TextField::new)?;
    page.define("textarea", "x-textarea-input", TextArea::new)?;
    page.define("checkbox", ".m-input-checkbox", Checkbox::new)?;
    page.define("range", ".m-input-range", Range::new)?;
    page.define("upload", ".m-input-upload", Upload::new)?;
    page.define(
        "filter-field",
        "filter-interface input, filter-interface select",
        FilterField::new,
    )?;
    page.define("filter", "filter-interface", FilterPanel::new)?;
    page.define(
        "placeholder",
        ".ui-search-suggestion-placeholder",
        PlaceholderSuggestions::new,
    )?;

    page.define("modal", "modal-interface", |ctx| Modal::new(ctx, ModalMarkup::INTERFACE))?;
    page.define("managed-modal", "[data-modal]", |ctx| Modal::new(ctx, ModalMarkup::MANAGED))?;
    page.define("dropdown", "dropdown-interface", Dropdown::new)?;

    page.define("tabs", "tab-interface", Tabs::new)?;
    page.define("sliding-tabs", ".m-sliding-tabs", SlidingTabs::new)?;
    page.define("accordion", "accordion-interface", Accordion::new)?;
    page.define("pagination", "x-pagination", Pagination::new)?;
    page.define("breadcrumb", ".m-breadcrumbs", Breadcrumb::new)?;
    page.define("skip-link", ".m-skip-to-content", SkipLink::new)?;
    page.define(
        "card-link",
        "card-link-interface, [card-link-interface]",
        CardLink::new,
    )?;
    page.define("horizontal-scrollbar", ".js-horizontalScrollbar__container", |ctx| {
        Scrollbar::new(ctx, Axis::Horizontal)
    })?;
    page.define("vertical-scrollbar", ".js-verticalScrollbar__container", |ctx| {
        Scrollbar::new(ctx, Axis::Vertical)
    })?;

    page.define("slider", "slider-interface, product-slider-interface", |ctx| {
        Slider::new(ctx, SliderMode::SLIDER)
    })?;
    page.define("history-slider", "history-slider-interface", |ctx| {
        Slider::new(ctx, SliderMode::HISTORY)
    })?;
    page.define("carousel", "image-carousel-interface", |ctx| {
        Slider::new(ctx, SliderMode::CAROUSEL)
    })?;

    page.define("secondary-nav", "secondary-nav-interface", SecondaryNav::new)?;
    page.define("header", ".ui-header", SiteHeader::new)?;
    page.define("recently-viewed", "[recently-viewed]", RecentlyViewed::new)?;
    page.define(
        "motion",
        "[data-motion-observer], [data-stagger-motion-observer]",
        Motion::new,
    )?;
    Ok(())
}
