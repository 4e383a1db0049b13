use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::catalog::CardOverlay;
use crate::error::SurfaceError;

/// Text layer stacked over the card canvas. Ignores pointer events so the
/// canvas underneath keeps receiving them.
pub struct OverlayLayer {
    root: HtmlElement,
}

impl OverlayLayer {
    pub fn mount(host: &HtmlElement, overlay: &CardOverlay) -> Result<Self, SurfaceError> {
        let document = host
            .owner_document()
            .ok_or_else(|| SurfaceError::Dom("host is not in a document".into()))?;

        let root = element(&document, "holocard-overlay")?;
        let style = root.style();
        for (prop, value) in [
            ("position", "absolute"),
            ("inset", "0"),
            ("pointer-events", "none"),
            ("display", "flex"),
            ("flex-direction", "column"),
            ("justify-content", "space-between"),
            ("padding", "1.5rem"),
            ("color", "white"),
        ] {
            style.set_property(prop, value)?;
        }

        let top = element(&document, "holocard-overlay-top")?;
        top.append_child(&text(&document, "holocard-category", &overlay.category)?)?;
        top.append_child(&text(&document, "holocard-rarity", overlay.rarity)?)?;

        let name = text(&document, "holocard-name", overlay.name)?;
        name.style().set_property("text-align", "center")?;

        let bottom = element(&document, "holocard-overlay-bottom")?;
        bottom.style().set_property("display", "flex")?;
        bottom.style().set_property("justify-content", "space-between")?;
        bottom.append_child(&text(&document, "holocard-tag", overlay.tag)?)?;
        bottom.append_child(&text(&document, "holocard-price", overlay.price)?)?;

        root.append_child(&top)?;
        root.append_child(&name)?;
        root.append_child(&bottom)?;

        if host.style().get_property_value("position")?.is_empty() {
            host.style().set_property("position", "relative")?;
        }
        host.append_child(&root)?;
        Ok(Self { root })
    }

    pub fn remove(&self) {
        self.root.remove();
    }
}

fn element(document: &Document, class: &str) -> Result<HtmlElement, SurfaceError> {
    let el: HtmlElement = document
        .create_element("div")?
        .dyn_into()
        .map_err(|_| SurfaceError::Dom("div is not an HtmlElement".into()))?;
    el.set_class_name(class);
    Ok(el)
}

fn text(document: &Document, class: &str, content: &str) -> Result<HtmlElement, SurfaceError> {
    let el = element(document, class)?;
    el.set_text_content(Some(content));
    Ok(el)
}
