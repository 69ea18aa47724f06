use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::{AnswerSet, BookIdentifier, RecommendedBook, SurveyQuestion};

/// Recommendation category shown as a tab on the results page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    /// Books matching the student's stated taste
    LikelyToEnjoy,
    /// Books chosen to broaden the student's taste
    DifferentTaste,
}

impl Tab {
    /// Wire key, also used in prompt-log names
    pub fn key(&self) -> &'static str {
        match self {
            Tab::LikelyToEnjoy => "likelyToEnjoy",
            Tab::DifferentTaste => "differentTaste",
        }
    }

    /// Heading shown to the student and named in the reasoning prompt
    pub fn heading(&self) -> &'static str {
        match self {
            Tab::LikelyToEnjoy => "Books You'll Likely Enjoy",
            Tab::DifferentTaste => "Books to Expand Your Taste",
        }
    }

    /// Statement used when the tab ends up without one
    pub fn default_statement(&self) -> &'static str {
        match self {
            Tab::LikelyToEnjoy => "Here are some books you might enjoy!",
            Tab::DifferentTaste => "Here are some books to expand your taste!",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A selected identifier paired with its justification, before reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationItem {
    pub identifier: BookIdentifier,
    pub justification: String,
}

/// One tab of a results bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabResult {
    pub overall_statement: String,
    pub books: Vec<RecommendedBook>,
}

/// Everything produced by one survey submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    pub quiz_answers: AnswerSet,
    pub quiz_questions: Vec<SurveyQuestion>,
    pub likely_to_enjoy: TabResult,
    pub different_taste: TabResult,
    pub timestamp: DateTime<Utc>,
    pub results_id: Uuid,
}

impl ResultBundle {
    pub fn new(
        quiz_questions: Vec<SurveyQuestion>,
        quiz_answers: AnswerSet,
        likely_to_enjoy: TabResult,
        different_taste: TabResult,
    ) -> Self {
        Self {
            quiz_answers,
            quiz_questions,
            likely_to_enjoy,
            different_taste,
            timestamp: Utc::now(),
            results_id: Uuid::new_v4(),
        }
    }

    pub fn tab(&self, tab: Tab) -> &TabResult {
        match tab {
            Tab::LikelyToEnjoy => &self.likely_to_enjoy,
            Tab::DifferentTaste => &self.different_taste,
        }
    }
}

/// Body of the submit endpoint
///
/// Both fields are optional on the wire so a missing one is reported as a 400 with the
/// standard error envelope rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub questions: Option<Vec<SurveyQuestion>>,
    #[serde(default)]
    pub answers: Option<AnswerSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub results_id: Uuid,
}

/// Query string of the retrieve endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsQuery {
    pub results_id: Option<String>,
}
