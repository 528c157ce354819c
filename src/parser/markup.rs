use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// Structural events fed to the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Open { tag: String, classes: Vec<String> },
    Close { tag: String },
    Text(Cow<'a, str>),
}

/// Tokenize an HTML document and pass every element open/close and text run to `sink`.
///
/// The reader is lenient: end names are not matched against open names, `<x/>`
/// is reported as open + close, and tokenizer errors are skipped.
pub fn read_events<F>(html: &str, mut sink: F)
where
    F: FnMut(MarkupEvent<'_>),
{
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.expand_empty_elements = true;

    let mut errors = 0usize;
    loop {
        let before = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => sink(MarkupEvent::Open {
                tag: tag_name(e.name().as_ref()),
                classes: class_list(&e),
            }),
            Ok(Event::End(e)) => sink(MarkupEvent::Close {
                tag: tag_name(e.name().as_ref()),
            }),
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(&e);
                let text = html_escape::decode_html_entities(&raw).into_owned();
                sink(MarkupEvent::Text(Cow::Owned(text)));
            }
            Ok(Event::CData(e)) => {
                sink(MarkupEvent::Text(Cow::Owned(
                    String::from_utf8_lossy(&e).into_owned(),
                )));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                errors += 1;
                debug!("Skipping malformed markup near byte {}: {}", before, e);
                if reader.buffer_position() <= before {
                    warn!("Markup reader stuck at byte {}, stopping early", before);
                    break;
                }
            }
        }
    }

    if errors > 0 {
        warn!("Skipped {} malformed markup fragments", errors);
    }
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn class_list(e: &BytesStart<'_>) -> Vec<String> {
    e.html_attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(b"class"))
        .map(|a| {
            String::from_utf8_lossy(&a.value)
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
