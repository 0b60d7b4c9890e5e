//! Image externalization.
//!
//! Every `<img>` is numbered in document order, whatever its source. Embedded
//! (`data:`) and local images are written to the asset directory as
//! `img<N><ext>` and their `src` is rewritten to `<prefix>/img<N><ext>`.
//! Remote images keep their URL but still consume a number, so file names
//! stay stable when a document mixes both.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::config::ImageSettings;
use crate::error::{ConvertError, Result};
use crate::log;
use crate::logger::Logger;
use crate::pipeline::scan::rewrite_elements;

/// `data:image/<subtype>[;param]*;<encoding>,<payload>`
static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^data:image/([A-Za-z0-9.+-]+)((?:;[^;,]*)+),(.*)$")
        .expect("data uri pattern is valid")
});

/// Classified `src` of an `<img>`.
#[derive(Debug, PartialEq, Eq)]
enum ImageRef<'a> {
    Embedded(&'a str),
    Local(PathBuf),
    Remote,
}

impl<'a> ImageRef<'a> {
    fn classify(src: &'a str, source_dir: &Path) -> Self {
        let lower = src.trim_start().to_ascii_lowercase();
        if lower.starts_with("data:") {
            return Self::Embedded(src.trim());
        }
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
        {
            return Self::Remote;
        }
        Self::Local(resolve_local(src, source_dir))
    }
}

/// Filesystem path for a local `src`, relative paths against `source_dir`.
fn resolve_local(src: &str, source_dir: &Path) -> PathBuf {
    let from_url = src
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file://"))
        .then(|| url::Url::parse(src).ok()?.to_file_path().ok())
        .flatten();

    let path = from_url.unwrap_or_else(|| {
        let decoded: Cow<'_, str> = percent_decode_str(src).decode_utf8_lossy();
        PathBuf::from(decoded.as_ref())
    });

    if path.is_relative() {
        source_dir.join(path)
    } else {
        path
    }
}

/// Decode a `data:` image into `(extension, bytes)`.
fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let caps = DATA_URI
        .captures(uri)
        .ok_or_else(|| ConvertError::MalformedDataUri(truncate(uri)))?;

    let subtype = caps[1].to_ascii_lowercase();
    let extension = subtype.split('+').next().unwrap_or(&subtype).to_string();

    let encoding = caps[2].rsplit(';').next().unwrap_or("").trim();
    if !encoding.eq_ignore_ascii_case("base64") {
        return Err(ConvertError::UnsupportedEncoding {
            encoding: encoding.to_string(),
        });
    }

    let payload: String = caps[3].chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(payload)?;
    Ok((format!(".{extension}"), bytes))
}

/// Shorten a data URI for error messages.
fn truncate(uri: &str) -> String {
    match uri.char_indices().nth(48) {
        Some((end, _)) => format!("{}...", &uri[..end]),
        None => uri.to_string(),
    }
}

/// Extension of a local image, with the leading dot.
///
/// Files without one are sniffed; unknown content gets no extension.
fn local_extension(path: &Path, bytes: Option<&[u8]>) -> String {
    if let Some(ext) = path.extension() {
        return format!(".{}", ext.to_string_lossy());
    }
    bytes
        .and_then(|bytes| image::guess_format(bytes).ok())
        .and_then(|format| format.extensions_str().first())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn asset_url(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// Write embedded and local images to the asset directory and point their
/// `src` at the copies.
///
/// Returns the rewritten HTML and the files written, in document order.
/// The first failure aborts; files already written are left in place.
pub fn externalize_images(
    html: &str,
    images: &ImageSettings,
    logger: &Logger,
) -> Result<(String, Vec<PathBuf>)> {
    let mut next = 0usize;
    let mut written = Vec::new();
    let mut dir_ready = false;

    let html = rewrite_elements(html, |element, _| {
        if element.name != "img" {
            return Ok(());
        }
        let index = next;
        next += 1;

        if !dir_ready {
            fs::create_dir_all(&images.dir).map_err(|e| ConvertError::io(&images.dir, e))?;
            dir_ready = true;
        }

        let Some(src) = element.attr("src").map(str::to_string) else {
            return Ok(());
        };

        let file_name = match ImageRef::classify(&src, &images.source_dir) {
            ImageRef::Remote => return Ok(()),
            ImageRef::Embedded(uri) => {
                let (ext, bytes) = decode_data_uri(uri)?;
                let file_name = format!("img{index}{ext}");
                let target = images.dir.join(&file_name);
                fs::write(&target, &bytes).map_err(|e| ConvertError::io(&target, e))?;
                log!(logger, "image"; "embedded image -> {}", target.display());
                written.push(target);
                file_name
            }
            ImageRef::Local(source) => {
                let file_name;
                let target;
                if source.extension().is_some() {
                    file_name = format!("img{index}{}", local_extension(&source, None));
                    target = images.dir.join(&file_name);
                    fs::copy(&source, &target).map_err(|e| ConvertError::io(&source, e))?;
                } else {
                    let bytes = fs::read(&source).map_err(|e| ConvertError::io(&source, e))?;
                    file_name = format!("img{index}{}", local_extension(&source, Some(&bytes)));
                    target = images.dir.join(&file_name);
                    fs::write(&target, &bytes).map_err(|e| ConvertError::io(&target, e))?;
                }
                log!(logger, "image"; "{} -> {}", source.display(), target.display());
                written.push(target);
                file_name
            }
        };

        element.set_attr("src", asset_url(&images.url_prefix, &file_name));
        Ok(())
    })?;

    Ok((html, written))
}
