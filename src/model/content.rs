//! Structured content produced from the community Google Doc.
//!
//! The document is bucketed into a two-level hierarchy of chapters and sections. Section and
//! chapter bodies carry lightweight markup (`**bold**`, `*italic*`, `__underline__`,
//! `~~strikethrough~~`, `[text](url)`) and image references of the form `![title](asset:ID)`
//! whose IDs resolve through [`DocumentContent::assets`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
pub struct DocumentContent {
    pub title: String,
    /// Body text appearing before the first chapter heading.
    pub introduction: String,
    pub chapters: Vec<Chapter>,
    pub assets: HashMap<String, Asset>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
pub struct Chapter {
    pub title: String,
    /// Body text between the chapter heading and its first section.
    pub content: String,
    pub sections: Vec<Section>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Image embedded in the document, keyed by its inline object id.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Asset {
    pub id: String,
    pub url: String,
    pub source_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}
