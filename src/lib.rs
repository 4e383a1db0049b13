//! Holographic card renderer: a WebGL2 plane whose fragment color follows
//! time and the pointer, tilting toward the cursor.
//!
//! The math, clock, pointer handling and program description build on any
//! target; the browser surface only compiles for wasm32.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod holo;
pub mod logging;
pub mod pointer;
pub mod scene;
pub mod shader;
pub mod state;

pub use config::SurfaceConfig;
pub use error::{ConfigError, ProgramError, SurfaceError};
pub use state::{CardModel, RenderState};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::catalog::{self, CardOverlay};
    use crate::logging::{init_logging, LoggingConfig};
    use crate::{SurfaceConfig, SurfaceError};

    mod gl;
    mod overlay;
    mod render;
    mod surface;

    pub use overlay::OverlayLayer;
    pub use render::RenderTask;
    pub use surface::{client_position, CardSurface};

    /// Id of the element the start hook mounts into, when present.
    pub const DEFAULT_HOST_ID: &str = "card";

    /// JS handle for one mounted card.
    #[wasm_bindgen]
    pub struct HoloCard {
        surface: CardSurface,
        overlay: Option<OverlayLayer>,
    }

    #[wasm_bindgen]
    impl HoloCard {
        /// Mounts a card into the element with id `host_id`.
        pub fn mount(host_id: &str) -> Result<HoloCard, JsValue> {
            let host = host_element(host_id)?;
            let surface = CardSurface::mount(&host, SurfaceConfig::default())?;
            Ok(HoloCard {
                surface,
                overlay: None,
            })
        }

        /// Mounts a card and overlays the name, rarity and price of catalog
        /// product `product_id`.
        pub fn mount_with_product(host_id: &str, product_id: u32) -> Result<HoloCard, JsValue> {
            let product = catalog::find(product_id)
                .ok_or_else(|| SurfaceError::Dom(format!("unknown product {product_id}")))?;
            let host = host_element(host_id)?;
            let surface = CardSurface::mount(&host, SurfaceConfig::default())?;
            let overlay = OverlayLayer::mount(&host, &CardOverlay::from(product))?;
            Ok(HoloCard {
                surface,
                overlay: Some(overlay),
            })
        }

        pub fn listener_count(&self) -> usize {
            self.surface.listener_count()
        }

        pub fn is_running(&self) -> bool {
            self.surface.is_running()
        }

        pub fn dispose(&mut self) {
            if let Some(overlay) = self.overlay.take() {
                overlay.remove();
            }
            self.surface.dispose();
        }
    }

    impl Drop for HoloCard {
        fn drop(&mut self) {
            // JS may call free() without dispose()
            if let Some(overlay) = self.overlay.take() {
                overlay.remove();
            }
        }
    }

    fn host_element(id: &str) -> Result<web_sys::HtmlElement, SurfaceError> {
        let window = web_sys::window().ok_or_else(|| SurfaceError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SurfaceError::Dom("no document".into()))?;
        document
            .get_element_by_id(id)
            .ok_or_else(|| SurfaceError::Dom(format!("host element #{id} not found")))?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| SurfaceError::Dom(format!("#{id} is not an HtmlElement")))
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        init_logging(LoggingConfig::default());

        let has_host = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(DEFAULT_HOST_ID))
            .is_some();
        if !has_host {
            log::debug!("no #{DEFAULT_HOST_ID} element, waiting for HoloCard.mount");
            return Ok(());
        }

        // lives for the page
        let card = HoloCard::mount_with_product(DEFAULT_HOST_ID, 1)?;
        std::mem::forget(card);
        Ok(())
    }
}
