//! Schema-driven HTML extraction
//!
//! A [`Schema`] maps field names to node selections. Running it over a
//! document yields every matched value per field, in document order. A field
//! whose nodes are absent yields an empty list; extraction itself never fails.

use crate::ShelfError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// How the values of one field are selected
#[derive(Debug, Clone)]
pub enum Selection {
    /// Direct text nodes of every matched element
    Text(Selector),

    /// The named attribute of every matched element
    Attr { selector: Selector, attr: String },

    /// Direct text of each `td` following a `th` whose text equals `label`
    LabeledCell { header: Selector, label: String },
}

#[derive(Debug, Clone)]
struct Field {
    name: String,
    selection: Selection,
}

/// A named set of field -> selection mappings for one page type
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Creates an empty schema
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Schema name, used in logs and selector errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Adds a field holding the direct text of elements matching `css`
    pub fn text(mut self, field: &str, css: &str) -> Result<Self, ShelfError> {
        let selector = self.compile(css)?;
        self.push(field, Selection::Text(selector));
        Ok(self)
    }

    /// Adds a field holding attribute `attr` of elements matching `css`
    pub fn attr(mut self, field: &str, css: &str, attr: &str) -> Result<Self, ShelfError> {
        let selector = self.compile(css)?;
        self.push(
            field,
            Selection::Attr {
                selector,
                attr: attr.to_string(),
            },
        );
        Ok(self)
    }

    /// Adds a field holding the table cell next to the header labelled `label`
    pub fn labeled_cell(mut self, field: &str, label: &str) -> Result<Self, ShelfError> {
        let header = self.compile("th")?;
        self.push(
            field,
            Selection::LabeledCell {
                header,
                label: label.to_string(),
            },
        );
        Ok(self)
    }

    fn push(&mut self, field: &str, selection: Selection) {
        self.fields.retain(|f| f.name != field);
        self.fields.push(Field {
            name: field.to_string(),
            selection,
        });
    }

    fn compile(&self, css: &str) -> Result<Selector, ShelfError> {
        Selector::parse(css).map_err(|e| ShelfError::Selector {
            schema: self.name.clone(),
            selector: css.to_string(),
            message: format!("{:?}", e),
        })
    }
}

/// Values extracted from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    values: HashMap<String, Vec<String>>,
}

impl Extraction {
    /// All values for a field; empty when the field's nodes were absent
    pub fn values(&self, field: &str) -> &[String] {
        self.values.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value for a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.values(field).first().map(String::as_str)
    }

    /// Returns true if the field matched nothing
    pub fn is_absent(&self, field: &str) -> bool {
        self.values(field).is_empty()
    }

    /// Consumes the extraction, returning the raw field map
    pub fn into_map(self) -> HashMap<String, Vec<String>> {
        self.values
    }
}

/// Runs a schema over a parsed document
pub fn extract(document: &Html, schema: &Schema) -> Extraction {
    let values = schema
        .fields
        .iter()
        .map(|field| (field.name.clone(), select_values(document, &field.selection)))
        .collect();

    Extraction { values }
}

/// Parses HTML text and runs a schema over it
///
/// # Example
///
/// ```
/// use shelfscan::crawler::{extract_html, Schema};
///
/// let schema = Schema::new("demo").labeled_cell("upc", "UPC").unwrap();
/// let html = "<table><tr><th>UPC</th><td>a897fe39b1053632</td></tr></table>";
/// let extraction = extract_html(html, &schema);
/// assert_eq!(extraction.first("upc"), Some("a897fe39b1053632"));
/// ```
pub fn extract_html(html: &str, schema: &Schema) -> Extraction {
    let document = Html::parse_document(html);
    extract(&document, schema)
}

fn select_values(document: &Html, selection: &Selection) -> Vec<String> {
    match selection {
        Selection::Text(selector) => document.select(selector).flat_map(own_text).collect(),

        Selection::Attr { selector, attr } => document
            .select(selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),

        Selection::LabeledCell { header, label } => document
            .select(header)
            .filter(|th| th.text().collect::<String>().trim() == label.as_str())
            .flat_map(|th| {
                th.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .filter(|sibling| sibling.value().name() == "td")
                    .flat_map(own_text)
                    .collect::<Vec<_>>()
            })
            .collect(),
    }
}

/// Trimmed, non-blank text nodes that are direct children of an element
fn own_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}
