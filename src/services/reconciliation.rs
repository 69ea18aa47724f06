use crate::models::{BookIdentifier, BookRecord, RecommendationItem, RecommendedBook};

/// Catalog titles must be longer than this to be eligible for substring matching
pub const FUZZY_MIN_TITLE_CHARS: usize = 5;

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Title equal ignoring case, author contained in the catalog author
    Exact,
    /// Titles contain one another
    Fuzzy,
}

/// Maps model-emitted identifiers back to catalog records
///
/// Never fabricates a record: every returned book is a copy of a catalog entry.
pub struct Reconciler<'a> {
    catalog: &'a [BookRecord],
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a [BookRecord]) -> Self {
        Self { catalog }
    }

    /// First catalog record whose title equals the candidate title and whose author contains
    /// the candidate author, both ignoring case
    pub fn find_exact(&self, id: &BookIdentifier) -> Option<&'a BookRecord> {
        let title = id.title.to_lowercase();
        let author = id.author.to_lowercase();

        self.catalog
            .iter()
            .find(|book| book.title.to_lowercase() == title && book.author.to_lowercase().contains(&author))
    }

    /// Substring match in either direction, restricted to catalog titles longer than
    /// `FUZZY_MIN_TITLE_CHARS` so short titles do not swallow unrelated candidates
    pub fn find_fuzzy(&self, id: &BookIdentifier) -> Option<&'a BookRecord> {
        let title = id.title.to_lowercase();
        if title.is_empty() {
            return None;
        }

        self.catalog.iter().find(|book| {
            let catalog_title = book.title.to_lowercase();
            catalog_title.chars().count() > FUZZY_MIN_TITLE_CHARS
                && (catalog_title.contains(&title) || title.contains(&catalog_title))
        })
    }

    /// Exact first, then fuzzy
    pub fn find(&self, id: &BookIdentifier) -> Option<(&'a BookRecord, MatchKind)> {
        if let Some(book) = self.find_exact(id) {
            return Some((book, MatchKind::Exact));
        }
        self.find_fuzzy(id).map(|book| (book, MatchKind::Fuzzy))
    }

    /// Resolves items in order, dropping any that match nothing
    pub fn reconcile(&self, items: &[RecommendationItem]) -> Vec<RecommendedBook> {
        items
            .iter()
            .filter_map(|item| match self.find(&item.identifier) {
                Some((book, kind)) => {
                    if kind == MatchKind::Fuzzy {
                        tracing::warn!(
                            book = %item.identifier,
                            matched = %book.identifier(),
                            "Book matched by fuzzy title search"
                        );
                    }
                    Some(RecommendedBook {
                        book: book.clone(),
                        justification: item.justification.clone(),
                    })
                }
                None => {
                    tracing::warn!(book = %item.identifier, "Book not found in catalog; dropping");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<BookRecord> {
        vec![
            BookRecord::new("Hamlet", "William Shakespeare"),
            BookRecord::new("Ulysses", "James Joyce"),
            BookRecord::new("Emma", "Jane Austen"),
            BookRecord::new("The Great Gatsby", "F. Scott Fitzgerald"),
        ]
    }

    fn id(raw: &str) -> BookIdentifier {
        BookIdentifier::parse(raw).unwrap()
    }

    fn item(raw: &str, justification: &str) -> RecommendationItem {
        RecommendationItem {
            identifier: id(raw),
            justification: justification.to_string(),
        }
    }

    #[test]
    fn test_exact_match() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let (book, kind) = reconciler.find(&id("Hamlet by William Shakespeare")).unwrap();
        assert_eq!(book.title, "Hamlet");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn test_exact_match_ignores_case_and_partial_author() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let (book, kind) = reconciler.find(&id("hamlet by shakespeare")).unwrap();
        assert_eq!(book.author, "William Shakespeare");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn test_fuzzy_match_when_candidate_contains_catalog_title() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let (book, kind) = reconciler
            .find(&id("Hamlet (abridged) by Shakespeare"))
            .unwrap();
        assert_eq!(book.title, "Hamlet");
        assert_eq!(kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_fuzzy_match_when_catalog_title_contains_candidate() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let (book, kind) = reconciler.find(&id("Great Gatsby by Fitzgerald")).unwrap();
        assert_eq!(book.title, "The Great Gatsby");
        assert_eq!(kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_short_catalog_titles_excluded_from_fuzzy() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        // "Emma" is only four characters long
        assert!(reconciler.find(&id("Emma Woodhouse Stories by Someone")).is_none());
        // but the exact rule still applies to it
        assert!(reconciler.find(&id("emma by austen")).is_some());
    }

    #[test]
    fn test_wrong_author_falls_back_to_fuzzy() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let (book, kind) = reconciler.find(&id("Ulysses by Homer")).unwrap();
        assert_eq!(book.title, "Ulysses");
        assert_eq!(kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_empty_title_never_matches() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        assert!(reconciler.find(&id(" by Nobody")).is_none());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        for raw in ["Hamlet by Shakespeare", "Gatsby by Fitzgerald", "Dune by Frank Herbert"] {
            let first = reconciler.find(&id(raw)).map(|(b, k)| (b.identifier(), k));
            let second = reconciler.find(&id(raw)).map(|(b, k)| (b.identifier(), k));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_reconcile_drops_unmatched_and_keeps_order() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let result = reconciler.reconcile(&[
            item("Ulysses by James Joyce", "one"),
            item("Dune by Frank Herbert", "two"),
            item("Hamlet by William Shakespeare", "three"),
        ]);

        let titles: Vec<&str> = result.iter().map(|r| r.book.title.as_str()).collect();
        assert_eq!(titles, vec!["Ulysses", "Hamlet"]);
        assert_eq!(result[1].justification, "three");
    }

    #[test]
    fn test_reconciled_books_come_from_catalog() {
        let books = catalog();
        let reconciler = Reconciler::new(&books);
        let result = reconciler.reconcile(&[
            item("HAMLET by shakespeare", "a"),
            item("The Great Gatsby Deluxe by Fitzgerald", "b"),
        ]);

        assert_eq!(result.len(), 2);
        for rec in &result {
            assert!(books.iter().any(|b| b == &rec.book));
        }
    }
}
