//! nbpress - publish computational notebooks to restrictive blog hosts.
//!
//! A notebook is rendered to HTML + CSS by an external [`Renderer`], then
//! post-processed into a single fragment that survives hosts which reject
//! `<style>` blocks, external stylesheets and `data:` images.
//!
//! # Pipeline
//!
//! ```text
//! notebook ─► Renderer ─► (html, css)
//!                            │     │
//!                            │     └─► normalize_css ──┐
//!                            └─► preclean_html ────────┴─► inline_css
//!                                                            │
//!      write_output ◄── rewrite_math ◄── strip_attributes ◄── externalize_images
//! ```
//!
//! The whole run is exposed as [`convert`]; every stage is also available on
//! its own under [`pipeline`].

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logger;
pub mod notebook;
pub mod pipeline;
pub mod render;

pub use config::{MathConfig, MathMode, Options, Settings, Template};
pub use error::{ConvertError, Result};
pub use logger::Logger;
pub use notebook::{Cell, CellKind, IpynbReader, Notebook, NotebookReader};
pub use pipeline::{Conversion, convert};
pub use render::{Rendered, Renderer};
