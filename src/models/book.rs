use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A catalog entry eligible for recommendation
///
/// Loaded from the catalog file once per submission and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PurchaseLinks>,
}

/// External purchase and review links for a book
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PurchaseLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookshop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goodreads: Option<String>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: String::new(),
            cover_url: String::new(),
            other_names: None,
            rank: None,
            links: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The "Title by Author" string shown to the model
    pub fn identifier(&self) -> String {
        format!("{}{}{}", self.title, IDENTIFIER_SEPARATOR, self.author)
    }

}

/// Structured form of a "Title by Author" string emitted by the model
///
/// The raw string is kept because the reasoning call keys its justifications by the exact
/// identifier it was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookIdentifier {
    pub raw: String,
    pub title: String,
    pub author: String,
}

/// Separator between title and author in model-facing identifiers
pub const IDENTIFIER_SEPARATOR: &str = " by ";

impl BookIdentifier {
    /// Splits on the first `" by "` in any letter case; returns `None` when the separator is
    /// absent
    pub fn parse(raw: &str) -> Option<Self> {
        // ASCII lowering keeps byte offsets valid for `raw`
        let at = raw.to_ascii_lowercase().find(IDENTIFIER_SEPARATOR)?;
        let title = &raw[..at];
        let author = &raw[at + IDENTIFIER_SEPARATOR.len()..];
        Some(Self {
            raw: raw.to_string(),
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        })
    }
}

impl Display for BookIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A catalog book augmented with the model's justification for recommending it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedBook {
    #[serde(flatten)]
    pub book: BookRecord,
    pub justification: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_format() {
        let book = BookRecord::new("Hamlet", "William Shakespeare");
        assert_eq!(book.identifier(), "Hamlet by William Shakespeare");
    }

    #[test]
    fn test_parse_identifier_splits_on_first_separator() {
        let id = BookIdentifier::parse("Stand by Me by Stephen King").unwrap();
        assert_eq!(id.title, "Stand");
        assert_eq!(id.author, "Me by Stephen King");
        assert_eq!(id.raw, "Stand by Me by Stephen King");
    }

    #[test]
    fn test_parse_identifier_trims_parts() {
        let id = BookIdentifier::parse("  Ulysses  by  James Joyce ").unwrap();
        assert_eq!(id.title, "Ulysses");
        assert_eq!(id.author, "James Joyce");
    }

    #[test]
    fn test_parse_identifier_without_separator() {
        assert_eq!(BookIdentifier::parse("Ulysses"), None);
    }

    #[test]
    fn test_parse_identifier_ignores_separator_case() {
        let id = BookIdentifier::parse("Hamlet BY William Shakespeare").unwrap();
        assert_eq!(id.title, "Hamlet");
        assert_eq!(id.author, "William Shakespeare");
        assert_eq!(id.raw, "Hamlet BY William Shakespeare");

        let id = BookIdentifier::parse("Les Misérables By Victor Hugo").unwrap();
        assert_eq!(id.title, "Les Misérables");
        assert_eq!(id.author, "Victor Hugo");
    }

    #[test]
    fn test_book_record_reads_catalog_json() {
        let json = r#"{
            "rank": 2,
            "title": "Ulysses",
            "author": "James Joyce",
            "description": "Leopold Bloom walks through Dublin.",
            "coverUrl": "https://example.com/ulysses.jpg",
            "links": { "amazon": "https://amazon.example/ulysses" }
        }"#;

        let book: BookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(book.rank, Some(2));
        assert_eq!(book.cover_url, "https://example.com/ulysses.jpg");
        assert_eq!(
            book.links.unwrap().amazon.as_deref(),
            Some("https://amazon.example/ulysses")
        );
        assert_eq!(book.other_names, None);
    }

    #[test]
    fn test_recommended_book_flattens_record() {
        let rec = RecommendedBook {
            book: BookRecord::new("Ulysses", "James Joyce"),
            justification: "Why you'll love this book: one day, every thought.".to_string(),
        };

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["title"], "Ulysses");
        assert_eq!(value["author"], "James Joyce");
        assert_eq!(
            value["justification"],
            "Why you'll love this book: one day, every thought."
        );
    }
}
