use super::*;
use serde_json::json;
use test_utils::factory::google_doc::{
    heading, inline_image, paragraph, section_break, styled_paragraph, styled_text, text,
    DocumentFactory,
};


fn parse(factory: DocumentFactory) -> DocumentContent {
    let document: Document = serde_json::from_value(factory.build()).unwrap();
    parse_document(&document)
}
