//! Plain-text renderings of generated scripts: the "download all" document,
//! its filename, and the per-card clipboard text.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::script::Script;

const SEPARATOR: &str = "-------------------------";

/// Only alphanumerics and `-._~` stay literal in the `filename*` parameter.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Concatenates every script, in order, into the downloadable document.
pub fn render_download(scripts: &[Script]) -> String {
    scripts
        .iter()
        .map(|s| {
            format!(
                "ROTEIRO: {}\nOBJETIVO: {}\n\nHOOK: {}\n\nBODY: {}\n\nCTA: {}\n\n{SEPARATOR}\n\n",
                s.title, s.objective, s.hook, s.body, s.cta
            )
        })
        .collect()
}

/// `ProRoteiro_<name>.txt`, with every run of whitespace in the name replaced by `_`.
pub fn download_filename(client_name: &str) -> String {
    let mut name = String::with_capacity(client_name.len());
    let mut in_whitespace = false;
    for c in client_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
        } else {
            name.push(c);
            in_whitespace = false;
        }
    }
    format!("ProRoteiro_{name}.txt")
}

/// `Content-Disposition` value for the download. Non-ASCII names go in the
/// RFC 5987 `filename*` parameter; the plain `filename` gets an ASCII fallback.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    let encoded = utf8_percent_encode(filename, FILENAME_ENCODE_SET);

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Text placed on the clipboard by a card's copy action.
pub fn copy_text(script: &Script) -> String {
    format!(
        "Título: {}\nObjetivo: {}\n\nHOOK:\n{}\n\nBODY:\n{}\n\nCTA:\n{}",
        script.title, script.objective, script.hook, script.body, script.cta
    )
}
