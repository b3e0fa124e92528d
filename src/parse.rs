//! SVG parsing from XML.

use std::collections::{BTreeSet, HashMap};

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::ConvertError;

/// Everything the pipeline learns from a single parse.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The `<svg>` element, names and attributes exactly as written
    pub root: Element,
    pub metadata: SvgMetadata,
    /// Distinct lowercase tag names under (and including) the root
    pub elements: BTreeSet<String>,
    pub has_gradients: bool,
    pub has_clip_paths: bool,
    pub has_transforms: bool,
}

/// Parse an SVG string into an element tree plus metadata and a feature census.
pub fn parse_svg(svg: &str) -> Result<ParseResult, ConvertError> {
    let (document, context) = parse_document(svg)?;

    let root = document
        .find(|e| e.is("svg"))
        .cloned()
        .ok_or(ConvertError::NoRootElement)?;

    let mut elements = BTreeSet::new();
    let mut has_gradients = false;
    let mut has_clip_paths = false;
    let mut has_transforms = false;

    root.for_each(|elem| {
        let tag = elem.name.to_lowercase();
        match tag.as_str() {
            "lineargradient" | "radialgradient" => has_gradients = true,
            "clippath" => has_clip_paths = true,
            _ => {}
        }
        if elem.attributes.contains_key("transform") {
            has_transforms = true;
        }
        elements.insert(tag);
    });

    let metadata = SvgMetadata {
        title: context.title.filter(|t| !t.is_empty()),
        desc: context.desc.filter(|t| !t.is_empty()),
        ..extract_metadata(&root)
    };

    Ok(ParseResult {
        root,
        metadata,
        elements,
        has_gradients,
        has_clip_paths,
        has_transforms,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RootState {
    #[default]
    Before,
    Inside,
    After,
}

/// What an element means to the parse beyond its own subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Plain,
    Root,
    Title,
    Desc,
}

/// State threaded through the recursive descent.
#[derive(Debug, Default)]
struct ParseContext {
    /// General entities from the DOCTYPE internal subset
    entities: HashMap<String, String>,
    /// Position relative to the first `<svg>` element
    root: RootState,
    /// Trimmed text content of the first `<title>` inside the root
    title: Option<String>,
    desc: Option<String>,
}

impl ParseContext {
    fn resolve_entity<'e>(&'e self, name: &str) -> Option<&'e str> {
        self.entities
            .get(name)
            .map(String::as_str)
            .or_else(|| resolve_predefined_entity(name))
    }

    fn enter(&mut self, name: &str) -> Role {
        match (self.root, name) {
            (RootState::Before, "svg") => {
                self.root = RootState::Inside;
                Role::Root
            }
            // Claimed on open so the first one in document order wins
            (RootState::Inside, "title") if self.title.is_none() => {
                self.title = Some(String::new());
                Role::Title
            }
            (RootState::Inside, "desc") if self.desc.is_none() => {
                self.desc = Some(String::new());
                Role::Desc
            }
            _ => Role::Plain,
        }
    }

    /// `content` is the concatenated text of the closed element's subtree.
    fn leave(&mut self, role: Role, content: &str) {
        match role {
            Role::Root => self.root = RootState::After,
            Role::Title => self.title = Some(content.trim().to_string()),
            Role::Desc => self.desc = Some(content.trim().to_string()),
            Role::Plain => {}
        }
    }
}

/// Parse the document element, whatever its name, and make sure nothing but
/// comments, processing instructions and whitespace follow it.
fn parse_document(svg: &str) -> Result<(Element, ParseContext), ConvertError> {
    let mut reader = Reader::from_str(svg);
    let mut context = ParseContext::default();

    let document = loop {
        match reader.read_event()? {
            Event::DocType(doctype) => {
                context.entities = parse_entity_declarations(&String::from_utf8_lossy(&doctype));
            }
            Event::Start(start) => break parse_element(&mut reader, &start, &mut context)?.0,
            Event::Empty(start) => break parse_empty_element(&start, &mut context)?,
            Event::Eof => return Err(ConvertError::NoRootElement),
            // Declarations, comments and whitespace before the root
            _ => {}
        }
    };

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) | Event::Empty(start) => {
                return Err(ConvertError::MalformedMarkup(format!(
                    "Unexpected element <{}> after the document element",
                    String::from_utf8_lossy(start.name().as_ref())
                )));
            }
            Event::End(end) => {
                return Err(ConvertError::MalformedMarkup(format!(
                    "Unexpected closing tag </{}> after the document element",
                    String::from_utf8_lossy(end.name().as_ref())
                )));
            }
            Event::Text(text) if !String::from_utf8_lossy(&text).trim().is_empty() => {
                return Err(ConvertError::MalformedMarkup(
                    "Unexpected text after the document element".into(),
                ));
            }
            _ => {}
        }
    }

    Ok((document, context))
}

/// General entities declared in a DOCTYPE internal subset, as written by
/// Illustrator: `<!ENTITY ns_svg "http://www.w3.org/2000/svg">`. Parameter
/// and external entities are skipped.
fn parse_entity_declarations(doctype: &str) -> HashMap<String, String> {
    const KEYWORD: &str = "<!ENTITY";

    let mut entities = HashMap::new();
    let mut rest = doctype;

    while let Some(pos) = rest.find(KEYWORD) {
        rest = rest[pos + KEYWORD.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let Some(name_end) = rest.find(char::is_whitespace) else {
            break;
        };
        let (name, after) = rest.split_at(name_end);
        let after = after.trim_start();

        let Some(quote) = after.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            rest = after;
            continue;
        };
        let value = &after[1..];
        let Some(close) = value.find(quote) else {
            break;
        };

        entities.insert(name.to_string(), value[..close].to_string());
        rest = &value[close + 1..];
    }

    entities
}

/// Parse an element and its subtree. Also returns the subtree's text content.
fn parse_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    context: &mut ParseContext,
) -> Result<(Element, String), ConvertError> {
    let mut element = parse_element_start(start, context)?;
    let role = context.enter(&element.name);
    let mut content = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (child, text) = parse_element(reader, &start, context)?;
                content.push_str(&text);
                element.children.push(child);
            }
            Event::Empty(start) => {
                element.children.push(parse_empty_element(&start, context)?);
            }
            Event::End(_) => break,
            Event::Text(text) => {
                let text = text.unescape_with(|name| context.resolve_entity(name))?;
                content.push_str(&text);
                // Last non-blank text node wins
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    element.text = Some(trimmed.to_string());
                }
            }
            Event::CData(cdata) => {
                content.push_str(&String::from_utf8_lossy(&cdata));
            }
            Event::Eof => {
                return Err(ConvertError::MalformedMarkup(format!(
                    "Unexpected end of file inside <{}>",
                    element.name
                )));
            }
            _ => {}
        }
    }

    context.leave(role, &content);
    Ok((element, content))
}

fn parse_empty_element(start: &BytesStart, context: &mut ParseContext) -> Result<Element, ConvertError> {
    let element = parse_element_start(start, context)?;
    let role = context.enter(&element.name);
    context.leave(role, "");
    Ok(element)
}

fn parse_element_start(start: &BytesStart, context: &ParseContext) -> Result<Element, ConvertError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value_with(|name| context.resolve_entity(name))?;
        element
            .attributes
            .insert(key.to_string(), AttrValue::Literal(value.into_owned()));
    }

    Ok(element)
}

/// Width, height and viewBox of the root.
fn extract_metadata(root: &Element) -> SvgMetadata {
    let mut metadata = SvgMetadata {
        width: root.literal_attr("width").and_then(parse_dimension),
        height: root.literal_attr("height").and_then(parse_dimension),
        ..Default::default()
    };

    if let Some(view_box) = root.literal_attr("viewBox").filter(|v| !v.is_empty()) {
        metadata.view_box = Some(view_box.to_string());

        let parts: Vec<&str> = view_box.split_whitespace().collect();
        if parts.len() == 4 {
            if metadata.width.is_none() {
                metadata.width = parse_float_prefix(parts[2]);
            }
            if metadata.height.is_none() {
                metadata.height = parse_float_prefix(parts[3]);
            }
        }
    }

    metadata
}

/// Strip everything but digits and dots, then parse. `"24px"` -> `24`.
fn parse_dimension(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_float_prefix(&cleaned)
}

/// Parse the longest numeric prefix of `s`, `parseFloat` style.
/// Returns `None` when no digits lead the string.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts if digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
