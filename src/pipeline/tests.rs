//! End-to-end conversion tests with a stub renderer.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempDir;

use super::*;
use crate::config::Template;
use crate::notebook::{CellKind, IpynbReader, Notebook};
use crate::render::Rendered;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake image body";

const NOTEBOOK: &str = r##"{
    "nbformat": 4,
    "nbformat_minor": 5,
    "metadata": {},
    "cells": [
        {"cell_type": "markdown", "metadata": {}, "source": ["Some $x$ math"]},
        {"cell_type": "code", "metadata": {}, "source": "plot()", "outputs": []},
        {"cell_type": "markdown", "metadata": {}, "source": "Price is \\$5, block: $$a^2$$"}
    ]
}"##;

/// Renders markdown cells as paragraphs inside an nbconvert-like page.
struct PageRenderer {
    css: Vec<String>,
    /// Extra body markup appended after the cells.
    extra: String,
}

impl PageRenderer {
    fn new(css: &[&str]) -> Self {
        Self {
            css: css.iter().map(|s| s.to_string()).collect(),
            extra: String::new(),
        }
    }

    fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

impl Renderer for PageRenderer {
    fn render(&self, notebook: &Notebook, _template: &Template) -> anyhow::Result<Rendered> {
        let mut body = String::new();
        for (i, cell) in notebook.cells_of(CellKind::Markdown).enumerate() {
            body.push_str(&format!(
                "<div class=\"cell\" id=\"cell-{i}\"><h2 id=\"h{i}\">Cell {i}<a class=\"anchor-link\" href=\"#h{i}\">&#182;</a></h2><p>{}</p></div>\n",
                cell.source
            ));
        }
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">\n<link rel=\"stylesheet\" href=\"custom.css\">\n<style>{}</style>\n</head>\n<body>\n{body}{}</body>\n</html>\n",
            self.css.join("\n"),
            self.extra
        );
        let mut rendered = Rendered::new(html);
        rendered.css = self.css.clone();
        Ok(rendered)
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _notebook: &Notebook, template: &Template) -> anyhow::Result<Rendered> {
        anyhow::bail!("template `{template}` not found")
    }
}

struct Fixture {
    tmp: TempDir,
    notebook: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let notebook = tmp.path().join("analysis.ipynb");
        fs::write(&notebook, NOTEBOOK).unwrap();
        Self { tmp, notebook }
    }

    fn out_dir(&self) -> PathBuf {
        self.tmp.path().join("out")
    }

    fn options(&self) -> Options {
        Options {
            output_dir: Some(self.out_dir()),
            css_file: None,
            quiet: true,
            ..Options::default()
        }
    }

    fn output_file(&self) -> PathBuf {
        self.out_dir().join("analysis.html")
    }

    fn convert(&self, options: &Options, renderer: &dyn Renderer) -> Result<Conversion> {
        convert(&self.notebook, options, &IpynbReader, renderer)
    }

    /// Run with a buffered logger and return its messages alongside the result.
    fn run_logged(
        &self,
        options: &Options,
        renderer: &dyn Renderer,
    ) -> (Result<Conversion>, Vec<String>) {
        let logger = Logger::buffered();
        let settings = options.resolve(&self.notebook).unwrap();
        let result = run(&self.notebook, &settings, &IpynbReader, renderer, &logger);
        (result, logger.messages())
    }
}

fn image_tag(bytes: &[u8]) -> String {
    format!(
        "<div class=\"output\"><img src=\"data:image/png;base64,{}\"></div>\n",
        STANDARD.encode(bytes)
    )
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_full_conversion() {
    let fx = Fixture::new();
    let renderer = PageRenderer::new(&[".cell { text-align: center }", "p { font-style: italic }"])
        .with_extra(image_tag(PNG) + "<style>.output { padding: 0 }</style>\n");

    let conversion = fx.convert(&fx.options(), &renderer).unwrap();

    assert_eq!(conversion.output, fx.output_file());
    let html = read(&conversion.output);
    assert_eq!(conversion.bytes, html.len());

    // head, stylesheet link and heading glyph are gone
    assert!(!html.contains("<head"), "{html}");
    assert!(!html.contains("<link"), "{html}");
    assert!(!html.contains("&#182;"), "{html}");
    // styles are inline, blocks and hooks removed
    assert!(!html.contains("<style"), "{html}");
    assert!(!html.contains("class="), "{html}");
    assert!(!html.contains(" id="), "{html}");
    assert!(html.contains(r#"<div style="text-align: center"><h2>Cell 0"#), "{html}");
    // math rewritten after everything else, `&` left unescaped
    assert!(
        html.contains(r#"<p style="font-style: italic">Some $latex x &bg=ffffff&s=2 $ math</p>"#),
        "{html}"
    );
    assert!(html.contains(r"Price is \$5, block: $latex a^2 &bg=ffffff&s=4 $"), "{html}");
    // image externalized
    assert!(html.contains(r#"<img src="img/img0.png">"#), "{html}");
    assert!(!html.contains("data:"), "{html}");
    assert_eq!(conversion.images, vec![fx.out_dir().join("img").join("img0.png")]);
    assert_eq!(fs::read(&conversion.images[0]).unwrap(), PNG);
}

#[test]
fn test_math_disabled_leaves_delimiters() {
    let fx = Fixture::new();
    let options = Options {
        math_mode: String::new(),
        ..fx.options()
    };

    let conversion = fx.convert(&options, &PageRenderer::new(&[])).unwrap();

    let html = read(&conversion.output);
    assert!(html.contains("Some $x$ math"), "{html}");
    assert!(html.contains("block: $$a^2$$"), "{html}");
    assert!(!html.contains("$latex"), "{html}");
}

#[test]
fn test_invalid_math_mode_writes_nothing() {
    let fx = Fixture::new();
    let options = Options {
        math_mode: "mathjax".into(),
        ..fx.options()
    };

    let err = fx.convert(&options, &PageRenderer::new(&[])).unwrap_err();

    assert!(matches!(err, ConvertError::InvalidMathMode(ref mode) if mode == "mathjax"));
    assert!(!fx.out_dir().exists());
}

#[test]
fn test_unsupported_encoding_aborts_before_write() {
    let fx = Fixture::new();
    let renderer = PageRenderer::new(&[])
        .with_extra(image_tag(PNG) + "<img src=\"data:image/png;uuencode,begin 644 x\">");

    let err = fx.convert(&fx.options(), &renderer).unwrap_err();

    assert!(matches!(err, ConvertError::UnsupportedEncoding { .. }), "{err:?}");
    assert!(!fx.output_file().exists());
    // the first image was already written and is not rolled back
    assert!(fx.out_dir().join("img").join("img0.png").exists());
}

#[test]
fn test_missing_css_warns_and_inlines_nothing() {
    let fx = Fixture::new();

    let (result, messages) = fx.run_logged(&fx.options(), &PageRenderer::new(&[]));

    let html = read(&result.unwrap().output);
    assert!(!html.contains("style="), "{html}");
    assert!(
        messages
            .iter()
            .any(|m| m == "[warning] no CSS is generated by the renderer"),
        "{messages:?}"
    );
    assert_eq!(messages[0], "[render] using template: full");
    assert!(messages.last().unwrap().contains("bytes written in"), "{messages:?}");
}

#[test]
fn test_css_file_overrides_renderer_css() {
    let fx = Fixture::new();
    let css_file = fx.tmp.path().join("custom.css");
    fs::write(&css_file, "/* house style */\np { text-align: right }").unwrap();
    let options = Options {
        css_file: Some(css_file.clone()),
        ..fx.options()
    };

    let (result, messages) =
        fx.run_logged(&options, &PageRenderer::new(&["p { text-align: left }"]));

    let html = read(&result.unwrap().output);
    assert!(html.contains(r#"<p style="text-align: right">"#), "{html}");
    assert!(!html.contains("text-align: left"), "{html}");
    assert!(messages.iter().any(|m| m.starts_with("[css] using CSS file")));
}

#[test]
fn test_missing_css_file_is_io_error() {
    let fx = Fixture::new();
    let options = Options {
        css_file: Some(fx.tmp.path().join("nope.css")),
        ..fx.options()
    };

    let err = fx.convert(&options, &PageRenderer::new(&[])).unwrap_err();

    assert!(err.is_not_found(), "{err:?}");
    assert!(!fx.output_file().exists());
}

#[test]
fn test_debug_dumps() {
    let fx = Fixture::new();
    let options = Options {
        save_css: true,
        save_html: true,
        ..fx.options()
    };
    let renderer = PageRenderer::new(&["/* note */ p { font-style: italic }"]);

    fx.convert(&options, &renderer).unwrap();

    let css = read(&fx.out_dir().join(CSS_DUMP));
    assert_eq!(css, " p { font-style: italic }\n");
    let input = read(&fx.out_dir().join(HTML_DUMP));
    assert!(!input.contains("<head"), "{input}");
    assert!(input.contains("class=\"cell\""), "{input}");
}

#[test]
fn test_images_disabled() {
    let fx = Fixture::new();
    let options = Options {
        save_images: false,
        ..fx.options()
    };
    let renderer = PageRenderer::new(&[]).with_extra(image_tag(PNG));

    let conversion = fx.convert(&options, &renderer).unwrap();

    assert!(conversion.images.is_empty());
    assert!(read(&conversion.output).contains("data:image/png;base64,"));
    assert!(!fx.out_dir().join("img").exists());
}

#[test]
fn test_keep_attributes() {
    let fx = Fixture::new();
    let options = Options {
        strip_attributes: false,
        ..fx.options()
    };
    let renderer = PageRenderer::new(&[]).with_extra("<style>p {}</style>");

    let html = read(&fx.convert(&options, &renderer).unwrap().output);

    assert!(html.contains(r#"<div class="cell" id="cell-0">"#), "{html}");
    assert!(!html.contains("<style"), "{html}");
}

#[test]
fn test_image_prefix_and_dir() {
    let fx = Fixture::new();
    let options = Options {
        image_dir: PathBuf::from("assets/figures"),
        image_url_prefix: "https://blog.example/uploads/".into(),
        ..fx.options()
    };
    let renderer = PageRenderer::new(&[]).with_extra(image_tag(PNG) + &image_tag(PNG));

    let conversion = fx.convert(&options, &renderer).unwrap();

    let html = read(&conversion.output);
    assert!(html.contains(r#"<img src="https://blog.example/uploads/img0.png">"#), "{html}");
    assert!(html.contains(r#"<img src="https://blog.example/uploads/img1.png">"#), "{html}");
    assert!(fx.out_dir().join("assets/figures/img1.png").exists());
}

#[test]
fn test_missing_notebook() {
    let fx = Fixture::new();
    let missing = fx.tmp.path().join("missing.ipynb");

    let err = convert(&missing, &fx.options(), &IpynbReader, &PageRenderer::new(&[])).unwrap_err();

    assert!(matches!(err, ConvertError::Notebook { ref path, .. } if *path == missing));
}

#[test]
fn test_renderer_failure() {
    let fx = Fixture::new();

    let err = fx.convert(&fx.options(), &FailingRenderer).unwrap_err();

    assert!(matches!(err, ConvertError::Render(_)));
    assert!(format!("{:#}", anyhow::Error::from(err)).contains("template `full` not found"));
    assert!(!fx.output_file().exists());
}
