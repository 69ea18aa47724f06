/// LLM gateway
///
/// Two calls with different failure tolerance:
/// - selection is mandatory: provider or parsing failures propagate and abort the submission
/// - reasoning is optional: any failure degrades to placeholder justifications
use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{
    config::Config,
    error::AppResult,
    models::{BookIdentifier, Tab},
    services::{
        prompt_log::PromptLog,
        prompts::{self, ReasoningCandidate, MAX_BOOKS_PER_TAB},
        providers::{CompletionRequest, LlmProvider},
    },
};

/// Justification used for every book when the reasoning call fails
pub const REASONING_UNAVAILABLE: &str = "Could not load reasoning for this book.";
/// Justification used when the model skipped a book
pub const REASONING_MISSING: &str = "No specific reasoning provided.";
/// Overall statement used when the reasoning call fails and nothing was recovered
pub const STATEMENT_UNAVAILABLE: &str = "We encountered an issue generating personalized insights for this section, but here are your book suggestions!";

/// Model parameters for both calls
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub selection_model: String,
    pub reasoning_model: String,
    pub temperature: f32,
    pub selection_max_tokens: Option<u32>,
    pub reasoning_max_tokens: u32,
}

impl From<&Config> for LlmSettings {
    fn from(config: &Config) -> Self {
        Self {
            selection_model: config.selection_model.clone(),
            reasoning_model: config.reasoning_model.clone(),
            temperature: config.llm_temperature,
            selection_max_tokens: config.selection_max_tokens,
            reasoning_max_tokens: config.reasoning_max_tokens,
        }
    }
}

/// Ranked picks for both tabs; produced only when the selection call succeeds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub likely_to_enjoy: Vec<BookIdentifier>,
    pub different_taste: Vec<BookIdentifier>,
}

impl Selection {
    pub fn for_tab(&self, tab: Tab) -> &[BookIdentifier] {
        match tab {
            Tab::LikelyToEnjoy => &self.likely_to_enjoy,
            Tab::DifferentTaste => &self.different_taste,
        }
    }
}

/// Outcome of a reasoning call; never an error
#[derive(Debug, Clone, PartialEq)]
pub enum Reasoning {
    Generated {
        overall_statement: String,
        justifications: HashMap<String, String>,
    },
    Degraded {
        recovered_statement: Option<String>,
    },
}

impl Reasoning {
    /// Reasoning for a tab with no books; no call is made
    pub fn empty() -> Self {
        Reasoning::Generated {
            overall_statement: String::new(),
            justifications: HashMap::new(),
        }
    }

    /// Statement for the tab; empty when the model produced none for an empty tab
    pub fn overall_statement(&self) -> &str {
        match self {
            Reasoning::Generated {
                overall_statement, ..
            } => overall_statement,
            Reasoning::Degraded {
                recovered_statement,
            } => recovered_statement.as_deref().unwrap_or(STATEMENT_UNAVAILABLE),
        }
    }

    /// Always non-empty
    pub fn justification_for(&self, identifier: &str) -> String {
        match self {
            Reasoning::Generated { justifications, .. } => justifications
                .get(identifier)
                .filter(|text| !text.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| REASONING_MISSING.to_string()),
            Reasoning::Degraded { .. } => REASONING_UNAVAILABLE.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Reasoning::Degraded { .. })
    }
}

/// A tab that is absent or `null` is an empty tab
#[derive(Debug, Deserialize)]
struct SelectionPayload {
    #[serde(default, rename = "likelyToEnjoy")]
    likely_to_enjoy: Option<Vec<SelectionEntry>>,
    #[serde(default, rename = "differentTaste")]
    different_taste: Option<Vec<SelectionEntry>>,
}

#[derive(Debug, Deserialize)]
struct SelectionEntry {
    #[serde(rename = "bookString")]
    book_string: String,
}

fn to_identifiers(entries: Vec<SelectionEntry>, tab: Tab) -> Vec<BookIdentifier> {
    entries
        .into_iter()
        .take(MAX_BOOKS_PER_TAB)
        .filter_map(|entry| {
            let parsed = BookIdentifier::parse(&entry.book_string);
            if parsed.is_none() {
                tracing::warn!(tab = %tab, book = %entry.book_string, "Selected book has no author; dropping");
            }
            parsed
        })
        .collect()
}

/// Parses the selection call's JSON; wrong shapes are parsing errors
pub fn parse_selection(content: &str) -> AppResult<Selection> {
    let payload: SelectionPayload = serde_json::from_str(content)?;
    Ok(Selection {
        likely_to_enjoy: to_identifiers(
            payload.likely_to_enjoy.unwrap_or_default(),
            Tab::LikelyToEnjoy,
        ),
        different_taste: to_identifiers(
            payload.different_taste.unwrap_or_default(),
            Tab::DifferentTaste,
        ),
    })
}

/// Parses the reasoning call's JSON, salvaging the statement from incomplete responses
pub fn parse_reasoning(content: &str) -> Reasoning {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Reasoning response is not valid JSON");
            return Reasoning::Degraded {
                recovered_statement: None,
            };
        }
    };

    let statement = value
        .get("overallStatement")
        .and_then(Value::as_str)
        .map(str::to_string);

    match (statement, value.get("bookReasonings").and_then(Value::as_object)) {
        (Some(overall_statement), Some(map)) => Reasoning::Generated {
            overall_statement,
            justifications: map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|text| (k.clone(), text.to_string())))
                .collect(),
        },
        (statement, _) => {
            tracing::warn!("Reasoning response has incorrect structure");
            Reasoning::Degraded {
                recovered_statement: statement.filter(|s| !s.trim().is_empty()),
            }
        }
    }
}

/// Entry point for both LLM calls
#[derive(Clone)]
pub struct Gateway {
    provider: Arc<dyn LlmProvider>,
    settings: LlmSettings,
    prompt_log: PromptLog,
}

impl Gateway {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: LlmSettings, prompt_log: PromptLog) -> Self {
        Self {
            provider,
            settings,
            prompt_log,
        }
    }

    pub fn ensure_configured(&self) -> AppResult<()> {
        self.provider.ensure_configured()
    }

    /// Asks the model to pick books for both tabs from the shuffled identifiers
    pub async fn select(&self, answers_text: &str, identifiers: &[String]) -> AppResult<Selection> {
        let prompt = prompts::selection_prompt(answers_text, identifiers);
        self.prompt_log
            .record("selection", &self.settings.selection_model, &prompt)
            .await;

        tracing::info!(
            provider = self.provider.name(),
            model = %self.settings.selection_model,
            catalog_books = identifiers.len(),
            prompt_chars = prompt.len(),
            "Requesting book selection"
        );

        let content = self
            .provider
            .complete_json(&CompletionRequest {
                model: self.settings.selection_model.clone(),
                prompt,
                temperature: self.settings.temperature,
                max_tokens: self.settings.selection_max_tokens,
            })
            .await?;

        let selection = parse_selection(&content)?;

        tracing::info!(
            likely_to_enjoy = selection.likely_to_enjoy.len(),
            different_taste = selection.different_taste.len(),
            "Book selection received"
        );

        Ok(selection)
    }

    /// Asks the model to justify a tab's books; failures degrade instead of propagating
    pub async fn reason(
        &self,
        answers_text: &str,
        candidates: &[ReasoningCandidate],
        tab: Tab,
    ) -> Reasoning {
        if candidates.is_empty() {
            return Reasoning::empty();
        }

        let prompt = prompts::reasoning_prompt(answers_text, candidates, tab);
        self.prompt_log
            .record(
                &format!("reasoning_{}", tab.key()),
                &self.settings.reasoning_model,
                &prompt,
            )
            .await;

        tracing::info!(
            tab = %tab,
            books = candidates.len(),
            model = %self.settings.reasoning_model,
            "Requesting reasoning"
        );

        let result = self
            .provider
            .complete_json(&CompletionRequest {
                model: self.settings.reasoning_model.clone(),
                prompt,
                temperature: self.settings.temperature,
                max_tokens: Some(self.settings.reasoning_max_tokens),
            })
            .await;

        let reasoning = match result {
            Ok(content) => parse_reasoning(&content),
            Err(e) => {
                tracing::warn!(tab = %tab, error = %e, "Reasoning call failed");
                Reasoning::Degraded {
                    recovered_statement: None,
                }
            }
        };

        if reasoning.is_degraded() {
            tracing::warn!(tab = %tab, "Using fallback reasoning");
        }

        reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockLlmProvider;

    fn settings() -> LlmSettings {
        LlmSettings {
            selection_model: "select-model".to_string(),
            reasoning_model: "reason-model".to_string(),
            temperature: 0.9,
            selection_max_tokens: None,
            reasoning_max_tokens: 1800,
        }
    }

    fn gateway(provider: MockLlmProvider) -> Gateway {
        Gateway::new(Arc::new(provider), settings(), PromptLog::disabled())
    }

    fn candidate(identifier: &str) -> ReasoningCandidate {
        let parsed = BookIdentifier::parse(identifier).unwrap();
        ReasoningCandidate {
            title: parsed.title,
            author: parsed.author,
            description: String::new(),
            identifier: identifier.to_string(),
        }
    }

    #[test]
    fn test_parse_selection_reads_both_tabs() {
        let selection = parse_selection(
            r#"{"likelyToEnjoy":[{"bookString":"Hamlet by William Shakespeare"}],
                "differentTaste":[{"bookString":"Ulysses by James Joyce"},{"bookString":"No Author Here"}]}"#,
        )
        .unwrap();

        assert_eq!(selection.likely_to_enjoy[0].title, "Hamlet");
        assert_eq!(selection.different_taste.len(), 1);
        assert_eq!(selection.for_tab(Tab::DifferentTaste)[0].author, "James Joyce");
    }

    #[test]
    fn test_parse_selection_caps_each_tab() {
        let entries: Vec<String> = (0..14)
            .map(|i| format!(r#"{{"bookString":"Book {} by Author {}"}}"#, i, i))
            .collect();
        let json = format!(r#"{{"likelyToEnjoy":[{}]}}"#, entries.join(","));

        let selection = parse_selection(&json).unwrap();
        assert_eq!(selection.likely_to_enjoy.len(), MAX_BOOKS_PER_TAB);
        assert_eq!(selection.likely_to_enjoy[9].title, "Book 9");
        assert!(selection.different_taste.is_empty());
    }

    #[test]
    fn test_parse_selection_null_tab_is_empty() {
        let selection = parse_selection(
            r#"{"likelyToEnjoy":[{"bookString":"Hamlet by William Shakespeare"}],"differentTaste":null}"#,
        )
        .unwrap();

        assert_eq!(selection.likely_to_enjoy.len(), 1);
        assert!(selection.different_taste.is_empty());
    }

    #[test]
    fn test_parse_selection_rejects_non_json() {
        let err = parse_selection("Sure! Here are some books").unwrap_err();
        assert_eq!(err.error_type(), Some("json_parsing_error"));
    }

    #[test]
    fn test_parse_selection_rejects_wrong_shape() {
        let err = parse_selection(r#"{"likelyToEnjoy":"Hamlet"}"#).unwrap_err();
        assert!(matches!(err, AppError::JsonParsing(_)));
    }

    #[test]
    fn test_parse_reasoning_complete() {
        let reasoning = parse_reasoning(
            r#"{"overallStatement":"**Primary Genre Focus: Tragedy**.\nYou like brooding.",
                "bookReasonings":{"Hamlet by William Shakespeare":"Why you'll love this book: ghosts."}}"#,
        );

        assert!(!reasoning.is_degraded());
        assert!(reasoning.overall_statement().starts_with("**Primary Genre Focus"));
        assert_eq!(
            reasoning.justification_for("Hamlet by William Shakespeare"),
            "Why you'll love this book: ghosts."
        );
        assert_eq!(reasoning.justification_for("Ulysses by James Joyce"), REASONING_MISSING);
    }

    #[test]
    fn test_parse_reasoning_recovers_statement_from_partial_response() {
        let reasoning = parse_reasoning(r#"{"overallStatement":"Partial but useful."}"#);
        assert!(reasoning.is_degraded());
        assert_eq!(reasoning.overall_statement(), "Partial but useful.");
        assert_eq!(reasoning.justification_for("anything"), REASONING_UNAVAILABLE);
    }

    #[test]
    fn test_parse_reasoning_garbage_uses_fallback_statement() {
        let reasoning = parse_reasoning("<html>502</html>");
        assert_eq!(reasoning.overall_statement(), STATEMENT_UNAVAILABLE);
    }

    #[test]
    fn test_blank_justification_replaced() {
        let reasoning = parse_reasoning(
            r#"{"overallStatement":"s","bookReasonings":{"A by B":"  ","C by D":42}}"#,
        );
        assert_eq!(reasoning.justification_for("A by B"), REASONING_MISSING);
        assert_eq!(reasoning.justification_for("C by D"), REASONING_MISSING);
    }

    #[tokio::test]
    async fn test_select_sends_selection_model() {
        let mut provider = MockLlmProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete_json()
            .withf(|req| req.model == "select-model" && req.prompt.contains("Hamlet by William Shakespeare"))
            .times(1)
            .returning(|_| {
                Ok(r#"{"likelyToEnjoy":[{"bookString":"Hamlet by William Shakespeare"}],"differentTaste":[]}"#.to_string())
            });

        let selection = gateway(provider)
            .select("answers", &["Hamlet by William Shakespeare".to_string()])
            .await
            .unwrap();
        assert_eq!(selection.likely_to_enjoy.len(), 1);
    }

    #[tokio::test]
    async fn test_select_propagates_provider_error() {
        let mut provider = MockLlmProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete_json()
            .returning(|_| Err(AppError::Provider("Rate limit reached".to_string())));

        let err = gateway(provider).select("answers", &[]).await.unwrap_err();
        assert_eq!(err.error_type(), Some("openai"));
    }

    #[tokio::test]
    async fn test_reason_degrades_on_provider_error() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete_json()
            .returning(|_| Err(AppError::Provider("timeout".to_string())));

        let reasoning = gateway(provider)
            .reason("answers", &[candidate("Hamlet by William Shakespeare")], Tab::LikelyToEnjoy)
            .await;

        assert!(reasoning.is_degraded());
        assert_eq!(
            reasoning.justification_for("Hamlet by William Shakespeare"),
            REASONING_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_reason_skips_call_for_empty_tab() {
        let mut provider = MockLlmProvider::new();
        provider.expect_complete_json().times(0);

        let reasoning = gateway(provider)
            .reason("answers", &[], Tab::DifferentTaste)
            .await;
        assert_eq!(reasoning, Reasoning::empty());
    }

    #[tokio::test]
    async fn test_reason_uses_reasoning_model_and_token_cap() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete_json()
            .withf(|req| {
                req.model == "reason-model"
                    && req.max_tokens == Some(1800)
                    && req.prompt.contains("Books to Expand Your Taste")
            })
            .times(1)
            .returning(|_| Ok(r#"{"overallStatement":"s","bookReasonings":{}}"#.to_string()));

        let reasoning = gateway(provider)
            .reason("answers", &[candidate("Ulysses by James Joyce")], Tab::DifferentTaste)
            .await;
        assert!(!reasoning.is_degraded());
    }
}
