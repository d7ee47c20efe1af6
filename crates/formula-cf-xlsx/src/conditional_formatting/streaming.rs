use formula_cf::ConditionalFormatting;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::xml::{XmlElement, NS_X14, NS_XM};

use super::worksheet::read_worksheet_blocks;
use super::ConditionalFormattingError;

#[derive(Debug, thiserror::Error)]
pub enum ConditionalFormattingStreamingError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attr(#[from] AttrError),
    #[error("xml is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Parse(#[from] ConditionalFormattingError),
    #[error("invalid worksheet xml: {0}")]
    Invalid(&'static str),
}

/// Same result as [`super::parse_worksheet_conditional_formatting`], without building a
/// tree for the whole worksheet.
///
/// The worksheet is scanned with [`quick_xml`] and only the top-level
/// `<conditionalFormatting>` blocks and any `<x14:conditionalFormattings>` are copied
/// out, into a `<worksheet>` wrapper carrying the original root's namespace
/// declarations. Cell data is never materialized.
pub fn parse_worksheet_conditional_formatting_streaming(
    worksheet_xml: &str,
) -> Result<Vec<ConditionalFormatting>, ConditionalFormattingStreamingError> {
    if !worksheet_xml.contains("conditionalFormatting") {
        return Ok(Vec::new());
    }
    let Some(wrapper) = extract_blocks(worksheet_xml)? else {
        return Ok(Vec::new());
    };
    let root =
        XmlElement::parse(wrapper.as_bytes()).map_err(ConditionalFormattingError::from)?;
    Ok(read_worksheet_blocks(&root))
}

struct WorksheetRoot {
    name: String,
    namespaces: Vec<(String, String)>,
}

impl WorksheetRoot {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ConditionalFormattingStreamingError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut namespaces = Vec::new();
        for attr in start.attributes().with_checks(false) {
            let attr = attr?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                // Raw (still escaped) value; it is written back verbatim.
                namespaces.push((
                    std::str::from_utf8(key)?.to_string(),
                    std::str::from_utf8(&attr.value)?.to_string(),
                ));
            }
        }
        Ok(Self { name, namespaces })
    }

    fn declares(&self, key: &str) -> bool {
        self.namespaces.iter().any(|(k, _)| k == key)
    }

    fn wrap(&self, blocks: &[String]) -> String {
        let capacity = blocks.iter().map(String::len).sum::<usize>() + 256;
        let mut out = String::with_capacity(capacity);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.namespaces {
            out.push_str(&format!(" {key}=\"{value}\""));
        }
        // x14 declarations often live on the `<ext>` element, which is not copied.
        if !self.declares("xmlns:x14") {
            out.push_str(&format!(" xmlns:x14=\"{NS_X14}\""));
        }
        if !self.declares("xmlns:xm") {
            out.push_str(&format!(" xmlns:xm=\"{NS_XM}\""));
        }
        out.push('>');
        for block in blocks {
            out.push_str(block);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
        out
    }
}

fn is_block(local: &[u8], depth: usize) -> bool {
    (local == b"conditionalFormatting" && depth == 0) || local == b"conditionalFormattings"
}

fn extract_blocks(
    worksheet_xml: &str,
) -> Result<Option<String>, ConditionalFormattingStreamingError> {
    let mut reader = Reader::from_str(worksheet_xml);
    reader.config_mut().trim_text(false);

    let mut root: Option<WorksheetRoot> = None;
    // Open elements below the root.
    let mut depth: usize = 0;
    let mut blocks: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if root.is_none() => root = Some(WorksheetRoot::from_start(&e)?),
            // `<worksheet/>`
            Event::Empty(_) if root.is_none() => return Ok(None),
            Event::Start(e) => {
                if is_block(e.local_name().as_ref(), depth) {
                    blocks.push(capture_element(&mut reader, Event::Start(e))?);
                } else {
                    depth += 1;
                }
            }
            Event::Empty(e) => {
                if is_block(e.local_name().as_ref(), depth) {
                    blocks.push(capture_element(&mut reader, Event::Empty(e))?);
                }
            }
            Event::End(_) => {
                if root.is_none() {
                    return Err(ConditionalFormattingStreamingError::Invalid(
                        "closing tag before the root element",
                    ));
                }
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if blocks.is_empty() {
        return Ok(None);
    }
    let root = root.ok_or(ConditionalFormattingStreamingError::Invalid(
        "missing worksheet root element",
    ))?;
    Ok(Some(root.wrap(&blocks)))
}

/// Copy `first` and, for a start tag, everything up to its matching end tag.
fn capture_element<'a>(
    reader: &mut Reader<&'a [u8]>,
    first: Event<'a>,
) -> Result<String, ConditionalFormattingStreamingError> {
    let mut writer = Writer::new(Vec::new());
    let open = matches!(first, Event::Start(_));
    writer.write_event(first).map_err(quick_xml::Error::from)?;

    if !open {
        return finish(writer);
    }
    let mut depth: usize = 0;
    loop {
        let event = reader.read_event()?;
        let done = match &event {
            Event::Start(_) => {
                depth += 1;
                false
            }
            Event::End(_) if depth == 0 => true,
            Event::End(_) => {
                depth -= 1;
                false
            }
            Event::Eof => {
                return Err(ConditionalFormattingStreamingError::Invalid(
                    "unterminated conditional formatting block",
                ))
            }
            _ => false,
        };
        writer.write_event(event).map_err(quick_xml::Error::from)?;
        if done {
            return finish(writer);
        }
    }
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ConditionalFormattingStreamingError> {
    String::from_utf8(writer.into_inner())
        .map_err(|err| ConditionalFormattingStreamingError::Utf8(err.utf8_error()))
}
