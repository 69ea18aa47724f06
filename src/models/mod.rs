mod book;
mod recovery;
mod results;
mod survey;

pub use book::{BookIdentifier, BookRecord, PurchaseLinks, RecommendedBook};
pub use recovery::{Recovery, RecoveryAction};
pub use results::{
    RecommendationItem, ResultBundle, ResultsQuery, SubmitRequest, SubmitResponse, Tab, TabResult,
};
pub use survey::{survey_questions, Answer, AnswerSet, QuestionKind, SurveyQuestion};
