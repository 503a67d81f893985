use std::path::Path;
use std::sync::OnceLock;

use log::{debug, warn};
use plotters::style::FontStyle;

/// Family name the charts ask for; registered fonts are stored under it.
pub const FAMILY: &str = "sans-serif";

/// DejaVu Sans, shipped with the crate so charts never lose their labels.
const BUNDLED: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Register a TTF font for chart text. Returns whether text can be drawn.
///
/// An unreadable or invalid `explicit` font falls back to the bundled one.
/// Only the first call does any work; the registration is process-wide.
pub fn install(explicit: Option<&Path>) -> bool {
    *INSTALLED.get_or_init(|| {
        if let Some(path) = explicit {
            match std::fs::read(path) {
                Ok(bytes) => {
                    // plotters keeps registered font data for the life of the process.
                    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                    if register(bytes) {
                        debug!("chart font: {}", path.display());
                        return true;
                    }
                    warn!(
                        "{} is not a usable TTF font, using bundled DejaVu Sans",
                        path.display()
                    );
                }
                Err(e) => warn!(
                    "cannot read font {}: {e}, using bundled DejaVu Sans",
                    path.display()
                ),
            }
        }
        let ok = register(BUNDLED);
        if !ok {
            warn!("bundled font rejected, charts are drawn without titles or axis labels");
        }
        ok
    })
}

fn register(bytes: &'static [u8]) -> bool {
    plotters::style::register_font(FAMILY, FontStyle::Normal, bytes).is_ok()
}
