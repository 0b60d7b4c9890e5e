//! String-to-string stages of the conversion.
//!
//! # Modules
//!
//! - `css`: drops rules the inliner cannot evaluate (CSS -> CSS)
//! - `head`: removes renderer artifacts before inlining
//! - `inline`: merges stylesheet rules into `style` attributes
//! - `media`: writes images to the asset directory and rewrites `src`
//! - `attrs`: removes `<style>` blocks, `class` and `id`
//! - `math`: rewrites `$`/`$$` spans into the math directive (must run last)

mod attrs;
mod css;
mod head;
mod inline;
mod math;
mod media;

pub use attrs::{remove_style_blocks, strip_attributes};
pub use css::normalize_css;
pub use head::preclean_html;
pub use inline::inline_css;
pub use math::rewrite_math;
pub use media::externalize_images;
