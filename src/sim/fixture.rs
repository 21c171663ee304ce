//! Builder for the canonical marketing page the controller was written for.
//!
//! ```text
//! body
//! ├── header.main-header
//! │   ├── button.mobile-menu-toggle > span.hamburger-line ×3
//! │   └── nav.main-nav > ul
//! │       ├── li.has-submenu > a.submenu-link, ul.submenu > li > a
//! │       └── li.dropdown > a.dropdown-toggle, ul.dropdown-menu > li > a
//! ├── section.carousel-container
//! │   ├── div.carousel-slide > div.slide-content   (real, then clones)
//! │   ├── button.carousel-btn.prev / .next
//! │   └── div.carousel-indicators > button.indicator
//! ├── section.services > div.service-card, img[data-src]
//! └── footer > p
//! ```

use crate::dom::{Dom, ElementId};
use crate::sim::SimDom;
use crate::state::ACTIVE_CLASS;
use serde::{Deserialize, Serialize};

/// Shape of the generated page. Zero counts omit that part entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLayout {
    /// Real carousel slides. Zero omits the whole carousel section.
    pub slides: usize,
    /// Trailing clones of the leading slides.
    pub cloned_slides: usize,
    /// Indicator buttons; `None` means one per real slide.
    pub indicators: Option<usize>,
    /// Whether the hamburger trigger is present.
    pub menu_toggle: bool,
    pub submenus: usize,
    pub dropdowns: usize,
    pub lazy_images: usize,
    pub service_cards: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            slides: 3,
            cloned_slides: 0,
            indicators: None,
            menu_toggle: true,
            submenus: 2,
            dropdowns: 2,
            lazy_images: 2,
            service_cards: 2,
        }
    }
}

/// Build the page at the given viewport width.
pub fn standard_page(layout: &PageLayout, viewport_width: u32) -> SimDom {
    let mut dom = SimDom::new(viewport_width);
    let body = dom.body();

    let header = dom.append(body, "header", &["main-header"]);
    if layout.menu_toggle {
        let toggle = dom.append(header, "button", &["mobile-menu-toggle"]);
        for _ in 0..3 {
            dom.append(toggle, "span", &["hamburger-line"]);
        }
    }
    let nav = dom.append(header, "nav", &["main-nav"]);
    let list = dom.append(nav, "ul", &[]);
    for i in 0..layout.submenus {
        let item = dom.append(list, "li", &["has-submenu"]);
        let link = dom.append(item, "a", &["submenu-link"]);
        dom.set_attribute(link, "href", &format!("#area-{i}"));
        let sub = dom.append(item, "ul", &["submenu"]);
        links(&mut dom, sub, 2);
    }
    for _ in 0..layout.dropdowns {
        let item = dom.append(list, "li", &["dropdown"]);
        let toggle = dom.append(item, "a", &["dropdown-toggle"]);
        dom.set_attribute(toggle, "href", "#");
        let menu = dom.append(item, "ul", &["dropdown-menu"]);
        links(&mut dom, menu, 3);
    }

    if layout.slides > 0 {
        let container = dom.append(body, "section", &["carousel-container"]);
        let total = layout.slides + layout.cloned_slides;
        for i in 0..total {
            let slide = dom.append(container, "div", &["carousel-slide"]);
            if i == 0 {
                dom.add_class(slide, ACTIVE_CLASS);
            }
            if i >= layout.slides {
                dom.set_attribute(slide, "aria-hidden", "true");
            }
            dom.append(slide, "div", &["slide-content"]);
        }
        dom.append(container, "button", &["carousel-btn", "prev"]);
        dom.append(container, "button", &["carousel-btn", "next"]);
        let strip = dom.append(container, "div", &["carousel-indicators"]);
        for _ in 0..layout.indicators.unwrap_or(layout.slides) {
            dom.append(strip, "button", &["indicator"]);
        }
    }

    if layout.service_cards > 0 || layout.lazy_images > 0 {
        let services = dom.append(body, "section", &["services"]);
        for _ in 0..layout.service_cards {
            dom.append(services, "div", &["service-card"]);
        }
        for i in 0..layout.lazy_images {
            let img = dom.append(services, "img", &[]);
            dom.set_attribute(img, "data-src", &format!("/images/service-{i}.avif"));
            dom.set_attribute(img, "alt", &format!("service {i}"));
        }
    }

    let footer = dom.append(body, "footer", &[]);
    dom.append(footer, "p", &[]);
    dom
}

fn links(dom: &mut SimDom, list: ElementId, count: usize) {
    for i in 0..count {
        let item = dom.append(list, "li", &[]);
        let link = dom.append(item, "a", &[]);
        dom.set_attribute(link, "href", &format!("#link-{i}"));
    }
}
