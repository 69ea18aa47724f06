use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    db::ResultsStore,
    error::{AppError, AppResult},
    models::{
        BookIdentifier, RecommendationItem, ResultBundle, SubmitRequest, Tab, TabResult,
    },
    services::{
        catalog::Catalog,
        gateway::{Gateway, Selection},
        prompts::{self, ReasoningCandidate},
        reconciliation::Reconciler,
    },
};

const NO_DESCRIPTION: &str = "No description available.";

/// Generates personalized book recommendations from survey answers
///
/// One submission makes one selection call followed by one reasoning call per tab. The
/// reasoning calls are independent and run concurrently.
pub struct RecommendationService {
    catalog: Catalog,
    gateway: Gateway,
    store: Arc<dyn ResultsStore>,
}

impl RecommendationService {
    pub fn new(catalog: Catalog, gateway: Gateway, store: Arc<dyn ResultsStore>) -> Self {
        Self {
            catalog,
            gateway,
            store,
        }
    }

    /// Runs the full flow and returns the id the bundle was stored under
    ///
    /// Configuration and catalog errors are raised before the provider is called.
    pub async fn submit(&self, request: SubmitRequest) -> AppResult<Uuid> {
        let start = Instant::now();
        self.gateway.ensure_configured()?;

        let (questions, answers) = match (request.questions, request.answers) {
            (Some(questions), Some(answers)) => (questions, answers),
            _ => {
                return Err(AppError::InvalidInput(
                    "Missing questions or answers in the request body.".to_string(),
                ))
            }
        };

        let catalog = self.catalog.load().await?;
        let answers_text = prompts::format_answers(&questions, &answers);
        let identifiers = prompts::shuffled_identifiers(&catalog, &mut rand::thread_rng());

        tracing::info!(
            answered = answers.len(),
            questions = questions.len(),
            catalog_books = catalog.len(),
            "Processing survey submission"
        );

        let selection = self.gateway.select(&answers_text, &identifiers).await?;
        let reconciler = Reconciler::new(&catalog);

        let (likely_to_enjoy, different_taste) = tokio::join!(
            self.build_tab(&answers_text, &selection, Tab::LikelyToEnjoy, &reconciler),
            self.build_tab(&answers_text, &selection, Tab::DifferentTaste, &reconciler),
        );

        let bundle = ResultBundle::new(questions, answers, likely_to_enjoy, different_taste);
        let results_id = bundle.results_id;
        self.store.store(bundle).await?;

        tracing::info!(
            results_id = %results_id,
            store = self.store.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations stored"
        );

        Ok(results_id)
    }

    /// Looks up a stored bundle by the raw `resultsId` query value
    pub async fn retrieve(&self, results_id: Option<&str>) -> AppResult<ResultBundle> {
        let raw = results_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing resultsId parameter".to_string()))?;

        let not_found = || AppError::NotFound("Results not found or expired".to_string());

        // Anything that is not a UUID was never issued by this service
        let id = Uuid::parse_str(raw).map_err(|_| not_found())?;

        self.store.fetch(&id).await?.ok_or_else(not_found)
    }

    async fn build_tab(
        &self,
        answers_text: &str,
        selection: &Selection,
        tab: Tab,
        reconciler: &Reconciler<'_>,
    ) -> TabResult {
        let picks = selection.for_tab(tab);
        let candidates: Vec<ReasoningCandidate> = picks
            .iter()
            .map(|id| reasoning_candidate(id, reconciler))
            .collect();

        let reasoning = self.gateway.reason(answers_text, &candidates, tab).await;

        let items: Vec<RecommendationItem> = picks
            .iter()
            .map(|id| RecommendationItem {
                identifier: id.clone(),
                justification: reasoning.justification_for(&id.raw),
            })
            .collect();

        let books = reconciler.reconcile(&items);

        tracing::info!(
            tab = %tab,
            selected = picks.len(),
            matched = books.len(),
            degraded = reasoning.is_degraded(),
            "Tab assembled"
        );

        let statement = reasoning.overall_statement();
        TabResult {
            overall_statement: if statement.trim().is_empty() {
                tab.default_statement().to_string()
            } else {
                statement.to_string()
            },
            books,
        }
    }
}

/// Prefers the catalog's own title, author and description when the pick resolves exactly
fn reasoning_candidate(id: &BookIdentifier, reconciler: &Reconciler<'_>) -> ReasoningCandidate {
    match reconciler.find_exact(id) {
        Some(book) => ReasoningCandidate {
            title: book.title.clone(),
            author: book.author.clone(),
            description: if book.description.is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                book.description.clone()
            },
            identifier: id.raw.clone(),
        },
        None => ReasoningCandidate {
            title: id.title.clone(),
            author: id.author.clone(),
            description: NO_DESCRIPTION.to_string(),
            identifier: id.raw.clone(),
        },
    }
}
