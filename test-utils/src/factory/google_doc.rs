//! Google Docs API `Document` payload factory.
//!
//! Builds documents in the shape returned by `GET /v1/documents/{id}`: a body made of
//! structural elements, each holding a paragraph with a named style and paragraph elements,
//! plus an `inlineObjects` table describing embedded images.

use serde_json::{json, Map, Value};

/// Factory for Google Docs documents.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::google_doc::{heading, paragraph, DocumentFactory};
///
/// let json = DocumentFactory::new("Handbook")
///     .element(heading("HEADING_1", "Clan Handbook"))
///     .element(heading("HEADING_2", "Raids"))
///     .element(paragraph("Bring snacks."))
///     .image("kix.abc", "Banner", "https://lh3.example/banner.png")
///     .build();
/// ```
pub struct DocumentFactory {
    title: String,
    content: Vec<Value>,
    inline_objects: Map<String, Value>,
}

impl DocumentFactory {
    /// Creates an empty document with the given API title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            inline_objects: Map::new(),
        }
    }

    /// Appends a structural element to the body.
    ///
    /// # Arguments
    /// - `element` - Element built with [`heading`], [`paragraph`] or [`styled_paragraph`]
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn element(mut self, element: Value) -> Self {
        self.content.push(element);
        self
    }

    /// Registers an embedded image in the inline object table.
    ///
    /// # Arguments
    /// - `object_id` - Inline object id referenced by [`inline_image`]
    /// - `title` - Alt title of the image
    /// - `content_uri` - Google-hosted URL of the image
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn image(mut self, object_id: &str, title: &str, content_uri: &str) -> Self {
        self.inline_objects.insert(
            object_id.to_string(),
            json!({
                "objectId": object_id,
                "inlineObjectProperties": {
                    "embeddedObject": {
                        "title": title,
                        "description": format!("{} description", title),
                        "imageProperties": {
                            "contentUri": content_uri,
                            "sourceUri": format!("https://source.example/{}", object_id),
                        },
                    },
                },
            }),
        );
        self
    }

    /// Registers an inline object without image properties, such as an embedded drawing.
    pub fn drawing(mut self, object_id: &str) -> Self {
        self.inline_objects.insert(
            object_id.to_string(),
            json!({
                "objectId": object_id,
                "inlineObjectProperties": {
                    "embeddedObject": {
                        "title": "Drawing",
                        "embeddedDrawingProperties": {},
                    },
                },
            }),
        );
        self
    }

    /// Builds the document JSON.
    pub fn build(self) -> Value {
        json!({
            "documentId": "doc-1",
            "title": self.title,
            "body": { "content": self.content },
            "inlineObjects": self.inline_objects,
        })
    }
}

fn paragraph_element(style: &str, elements: Vec<Value>) -> Value {
    json!({
        "paragraph": {
            "elements": elements,
            "paragraphStyle": { "namedStyleType": style },
        },
    })
}

/// Plain text run element.
pub fn text(content: &str) -> Value {
    json!({ "textRun": { "content": content, "textStyle": {} } })
}

/// Text run element with an explicit `textStyle` object.
pub fn styled_text(content: &str, style: Value) -> Value {
    json!({ "textRun": { "content": content, "textStyle": style } })
}

/// Inline image element referencing an entry of the inline object table.
pub fn inline_image(object_id: &str) -> Value {
    json!({ "inlineObjectElement": { "inlineObjectId": object_id } })
}

/// Heading paragraph such as `TITLE`, `HEADING_1`, `HEADING_2` or `HEADING_3`.
pub fn heading(style: &str, title: &str) -> Value {
    paragraph_element(style, vec![text(&format!("{}\n", title))])
}

/// `NORMAL_TEXT` paragraph made of one unstyled run, terminated by a newline.
pub fn paragraph(content: &str) -> Value {
    paragraph_element("NORMAL_TEXT", vec![text(&format!("{}\n", content))])
}

/// `NORMAL_TEXT` paragraph made of arbitrary elements.
pub fn styled_paragraph(elements: Vec<Value>) -> Value {
    paragraph_element("NORMAL_TEXT", elements)
}

/// Structural element that is not a paragraph.
pub fn section_break() -> Value {
    json!({ "sectionBreak": { "sectionStyle": {} } })
}
