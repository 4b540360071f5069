//! Document model: the paragraph sequence handed to the serializer.
//!
//! The mapping is deliberately line-granular. One extracted line becomes one
//! paragraph, blank lines included, and nothing is reflowed. Reconstructing
//! visual paragraphs across wrapped lines is out of scope.

use serde::{Deserialize, Serialize};

/// Ordered lines of text pulled out of one PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub lines: Vec<String>,
}

impl ExtractedText {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A single paragraph of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

/// Ordered paragraphs; `paragraphs[i].text == lines[i]` of its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub paragraphs: Vec<Paragraph>,
}

impl StructuredDocument {
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// Build the paragraph model from extracted lines. Total: never fails.
pub fn build_document(text: &ExtractedText) -> StructuredDocument {
    StructuredDocument {
        paragraphs: text
            .lines
            .iter()
            .map(|line| Paragraph { text: line.clone() })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_empty_document() {
        let doc = build_document(&ExtractedText::default());
        assert_eq!(doc.paragraph_count(), 0);
    }

    #[test]
    fn one_paragraph_per_line_in_order() {
        let text = ExtractedText::new(vec!["one".into(), "".into(), "three".into()]);
        let doc = build_document(&text);

        assert_eq!(doc.paragraph_count(), text.len());
        for (line, para) in text.lines.iter().zip(&doc.paragraphs) {
            assert_eq!(line, &para.text);
        }
    }

    #[test]
    fn building_is_repeatable() {
        let text = ExtractedText::new(vec!["a".into(), "b".into()]);
        assert_eq!(build_document(&text), build_document(&text));
    }
}
