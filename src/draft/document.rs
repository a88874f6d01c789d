//! Typed view over a service definition draft document

use crate::error::PublishError;
use crate::system::System;
use anyhow::{Context as _, Result};
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use std::ops::Range;
use std::path::Path;

const MANIFEST_TAG: &str = "SVCManifest";
const TYPE_TAG: &str = "Type";
const STATE_TAG: &str = "State";
const TYPE_NAME_TAG: &str = "TypeName";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// A rewritable text node inside the draft
///
/// `span` is the byte range of the node's raw text in the source document,
/// inside the markers for a CDATA section. `value` is the raw (still
/// escaped, for text) content that will be written back there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DraftField {
    span: Range<usize>,
    value: String,
    cdata: bool,
}

impl DraftField {
    /// Current raw text of the field
    #[must_use]
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Byte range of the field in the source document
    #[must_use]
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    fn set(&mut self, value: &str) {
        self.value = if self.cdata {
            // A CDATA section cannot contain its own terminator
            value.replace(CDATA_CLOSE, "]]]]><![CDATA[>")
        } else {
            escape(value).into_owned()
        };
    }
}

/// Service definition draft with its three rewritable fields located
///
/// The manifest fields are lists because the document format does not
/// forbid repeats; a generated draft carries exactly one of each.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ServiceDraft {
    source: String,
    service_type: Vec<DraftField>,
    state: Vec<DraftField>,
    type_names: Vec<DraftField>,
}

/// Element on the open-element stack while scanning
struct OpenElement {
    name: String,
    has_children: bool,
}

impl ServiceDraft {
    /// Parse a draft document
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document is not well-formed XML
    #[inline]
    pub fn parse(source: String) -> Result<Self> {
        let mut service_type = Vec::new();
        let mut state = Vec::new();
        let mut type_names = Vec::new();

        {
            let mut reader = Reader::from_str(&source);
            let mut stack: Vec<OpenElement> = Vec::new();

            loop {
                let start = usize::try_from(reader.buffer_position()).map_err(|_| {
                    PublishError::draft("Draft document is too large to index".to_owned())
                })?;

                let event = reader.read_event().map_err(|err| {
                    PublishError::draft(format!(
                        "Malformed draft XML at byte {}: {err}",
                        reader.error_position()
                    ))
                })?;

                let value_span = match event {
                    Event::Start(element) => {
                        if let Some(parent) = stack.last_mut() {
                            parent.has_children = true;
                        }
                        stack.push(OpenElement {
                            name: String::from_utf8_lossy(element.local_name().as_ref())
                                .into_owned(),
                            has_children: false,
                        });
                        None
                    }
                    Event::End(_) => {
                        stack.pop();
                        None
                    }
                    Event::Text(text) => Some((start..start + text.len(), false)),
                    Event::CData(cdata) => {
                        let inner = start + CDATA_OPEN.len();
                        Some((inner..inner + cdata.len(), true))
                    }
                    Event::Eof => break,
                    _ => {
                        if let Some(current) = stack.last_mut() {
                            current.has_children = true;
                        }
                        None
                    }
                };

                let Some((span, cdata)) = value_span else {
                    continue;
                };
                let depth = stack.len();
                let Some(current) = stack.last_mut() else {
                    continue;
                };
                // Only the first child of an element is read as its value
                if current.has_children {
                    continue;
                }
                current.has_children = true;

                let Some(raw) = source.get(span.clone()) else {
                    continue;
                };
                let field = DraftField {
                    span,
                    value: raw.to_owned(),
                    cdata,
                };

                let parent = depth
                    .checked_sub(2)
                    .and_then(|index| stack.get(index))
                    .map(|element| element.name.as_str());
                let name = stack
                    .last()
                    .map(|element| element.name.as_str())
                    .unwrap_or_default();

                match (parent, name) {
                    (Some(MANIFEST_TAG), TYPE_TAG) => service_type.push(field),
                    (Some(MANIFEST_TAG), STATE_TAG) => state.push(field),
                    (_, TYPE_NAME_TAG) => type_names.push(field),
                    _ => {}
                }
            }
        }

        Ok(Self {
            source,
            service_type,
            state,
            type_names,
        })
    }

    /// Load and parse a draft file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file is not well-formed XML
    #[inline]
    pub fn load(system: &dyn System, path: &Path) -> Result<Self> {
        let source = system
            .read_to_string(path)
            .map_err(|err| {
                PublishError::draft(format!(
                    "Failed to read draft '{}': {err}",
                    path.display()
                ))
            })?;
        Self::parse(source).with_context(|| format!("Failed to parse draft '{}'", path.display()))
    }

    /// Serialize the draft and write it to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be written
    #[inline]
    pub fn save(&self, system: &dyn System, path: &Path) -> Result<()> {
        system.write(path, self.to_xml().as_bytes()).map_err(|err| {
            PublishError::draft(format!(
                "Failed to write draft '{}': {err}",
                path.display()
            ))
            .into()
        })
    }

    /// `SVCManifest/Type` fields
    #[must_use]
    #[inline]
    pub fn service_type(&self) -> &[DraftField] {
        &self.service_type
    }

    /// `SVCManifest/State` fields
    #[must_use]
    #[inline]
    pub fn state(&self) -> &[DraftField] {
        &self.state
    }

    /// All `TypeName` fields in document order
    #[must_use]
    #[inline]
    pub fn type_names(&self) -> &[DraftField] {
        &self.type_names
    }

    /// Overwrite every `SVCManifest/Type`, returning how many were set
    #[inline]
    pub fn set_service_type(&mut self, value: &str) -> usize {
        for field in &mut self.service_type {
            field.set(value);
        }
        self.service_type.len()
    }

    /// Overwrite every `SVCManifest/State`, returning how many were set
    #[inline]
    pub fn set_state(&mut self, value: &str) -> usize {
        for field in &mut self.state {
            field.set(value);
        }
        self.state.len()
    }

    /// Replace every `TypeName` equal to `from` with `to`
    ///
    /// Returns the number of fields that changed.
    #[inline]
    pub fn retype(&mut self, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for field in &mut self.type_names {
            if field.value == from {
                field.set(to);
                changed += 1;
            }
        }
        changed
    }

    /// Render the document with the current field values
    ///
    /// Every byte outside the located fields is copied from the source.
    #[must_use]
    #[inline]
    pub fn to_xml(&self) -> String {
        let mut fields: Vec<&DraftField> = self
            .service_type
            .iter()
            .chain(&self.state)
            .chain(&self.type_names)
            .collect();
        fields.sort_by_key(|field| field.span.start);

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for field in fields {
            output.push_str(self.source.get(cursor..field.span.start).unwrap_or_default());
            output.push_str(&field.value);
            cursor = field.span.end;
        }
        output.push_str(self.source.get(cursor..).unwrap_or_default());
        output
    }
}
