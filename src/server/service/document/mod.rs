//! Google Doc structural parser.
//!
//! Walks the document body once, using heading styles to bucket paragraphs into
//! chapters (`HEADING_2`) and sections (`HEADING_3`). `TITLE` and `HEADING_1` name the
//! document. Everything else is rendered with lightweight markup and appended to the
//! innermost open container.

pub mod markup;

#[cfg(test)]
mod test;

use std::collections::HashMap;

use crate::{
    model::content::{Asset, Chapter, DocumentContent, Section},
    server::model::google_doc::{Document, InlineObject, Paragraph, ParagraphElement},
};

use self::markup::render_text_run;

const STYLE_TITLE: &str = "TITLE";
const STYLE_HEADING_1: &str = "HEADING_1";
const STYLE_HEADING_2: &str = "HEADING_2";
const STYLE_HEADING_3: &str = "HEADING_3";

/// Prefix of image references emitted into content, resolved through the asset map.
pub const ASSET_SCHEME: &str = "asset:";

/// Parses a Google Docs API document into chapters, sections and assets.
///
/// The document's API title is used until a `TITLE` or `HEADING_1` paragraph replaces it.
/// A `HEADING_3` before any chapter opens an untitled chapter to hold it.
///
/// # Arguments
/// - `document` - Document resource as returned by the Docs API
///
/// # Returns
/// - `DocumentContent` - Parsed hierarchy with image metadata keyed by inline object id
pub fn parse_document(document: &Document) -> DocumentContent {
    let mut builder = ContentBuilder::new(document.title.trim().to_string());

    for paragraph in document
        .body
        .content
        .iter()
        .filter_map(|element| element.paragraph.as_ref())
    {
        match paragraph.named_style() {
            Some(STYLE_TITLE) | Some(STYLE_HEADING_1) => {
                builder.set_title(heading_text(paragraph));
            }
            Some(STYLE_HEADING_2) => builder.open_chapter(heading_text(paragraph)),
            Some(STYLE_HEADING_3) => builder.open_section(heading_text(paragraph)),
            _ => builder.append(&render_paragraph(paragraph, &document.inline_objects)),
        }
    }

    let mut content = builder.finish();
    content.assets = extract_assets(&document.inline_objects);
    content
}

/// Plain text of a heading, without markup or the trailing newline.
fn heading_text(paragraph: &Paragraph) -> String {
    paragraph
        .elements
        .iter()
        .filter_map(|element| element.text_run.as_ref())
        .map(|run| run.content.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

fn render_paragraph(paragraph: &Paragraph, objects: &HashMap<String, InlineObject>) -> String {
    paragraph
        .elements
        .iter()
        .map(|element| render_element(element, objects))
        .collect()
}

fn render_element(element: &ParagraphElement, objects: &HashMap<String, InlineObject>) -> String {
    if let Some(run) = &element.text_run {
        return render_text_run(run);
    }

    match &element.inline_object_element {
        Some(inline) => {
            let title = objects
                .get(&inline.inline_object_id)
                .and_then(|object| object.embedded_object())
                .and_then(|embedded| embedded.title.clone())
                .unwrap_or_default();
            format!("![{}]({}{})", title, ASSET_SCHEME, inline.inline_object_id)
        }
        None => String::new(),
    }
}

/// Collects image metadata for every inline object carrying image properties.
fn extract_assets(objects: &HashMap<String, InlineObject>) -> HashMap<String, Asset> {
    objects
        .iter()
        .filter_map(|(id, object)| {
            let embedded = object.embedded_object()?;
            let image = embedded.image_properties.as_ref()?;
            let url = image.content_uri.clone()?;

            Some((
                id.clone(),
                Asset {
                    id: id.clone(),
                    url,
                    source_url: image.source_uri.clone(),
                    title: embedded.title.clone(),
                    description: embedded.description.clone(),
                },
            ))
        })
        .collect()
}

/// Single-pass accumulator holding the chapter and section currently open.
struct ContentBuilder {
    content: DocumentContent,
    chapter: Option<Chapter>,
    section: Option<Section>,
}

impl ContentBuilder {
    fn new(title: String) -> Self {
        Self {
            content: DocumentContent {
                title,
                ..DocumentContent::default()
            },
            chapter: None,
            section: None,
        }
    }

    fn set_title(&mut self, title: String) {
        if !title.is_empty() {
            self.content.title = title;
        }
    }

    fn close_section(&mut self) {
        if let Some(section) = self.section.take() {
            self.chapter
                .get_or_insert_with(Chapter::default)
                .sections
                .push(section);
        }
    }

    fn close_chapter(&mut self) {
        self.close_section();
        if let Some(chapter) = self.chapter.take() {
            self.content.chapters.push(chapter);
        }
    }

    fn open_chapter(&mut self, title: String) {
        self.close_chapter();
        self.chapter = Some(Chapter {
            title,
            ..Chapter::default()
        });
    }

    fn open_section(&mut self, title: String) {
        self.close_section();
        if self.chapter.is_none() {
            self.chapter = Some(Chapter::default());
        }
        self.section = Some(Section {
            title,
            content: String::new(),
        });
    }

    fn append(&mut self, text: &str) {
        let target = match (&mut self.section, &mut self.chapter) {
            (Some(section), _) => &mut section.content,
            (None, Some(chapter)) => &mut chapter.content,
            (None, None) => &mut self.content.introduction,
        };
        target.push_str(text);
    }

    fn finish(mut self) -> DocumentContent {
        self.close_chapter();
        self.content
    }
}
