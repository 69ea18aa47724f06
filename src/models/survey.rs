use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of survey question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice
    Mcq,
    /// Free response
    Frq,
}

impl QuestionKind {
    /// Upper-case tag used when rendering answers into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "MCQ",
            QuestionKind::Frq => "FRQ",
        }
    }
}

/// One question of the reading-preferences survey
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// A single answer: one string, or several for multi-select questions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// Answer text as it appears in a prompt; list answers are comma-joined
    pub fn to_prompt_text(&self) -> String {
        match self {
            Answer::Single(text) => text.clone(),
            Answer::Multiple(items) => items.join(", "),
        }
    }
}

/// Question id to answer
pub type AnswerSet = BTreeMap<String, Answer>;

fn choice(id: &str, question: &str, options: [&str; 4]) -> SurveyQuestion {
    SurveyQuestion {
        id: id.to_string(),
        kind: QuestionKind::Mcq,
        question: question.to_string(),
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        allow_multiple: None,
        placeholder: None,
    }
}

fn free_response(id: &str, question: &str, placeholder: &str) -> SurveyQuestion {
    SurveyQuestion {
        id: id.to_string(),
        kind: QuestionKind::Frq,
        question: question.to_string(),
        options: None,
        allow_multiple: None,
        placeholder: Some(placeholder.to_string()),
    }
}

/// The fixed, ordered survey every student answers
pub fn survey_questions() -> Vec<SurveyQuestion> {
    vec![
        choice(
            "q1_social_person",
            "Are you a social person?",
            [
                "Very social and outgoing",
                "Somewhat social",
                "Mostly introverted",
                "Strongly prefer solitude",
            ],
        ),
        choice(
            "q2_character_dynamics",
            "How do you feel about character dynamics in friend groups?",
            [
                "I enjoy complex group interactions",
                "I prefer focus on a few close relationships",
                "I'm more interested in individual character development",
                "I don't particularly care about social dynamics",
            ],
        ),
        choice(
            "q3_solitary_ensemble",
            "Do you prefer books with solitary characters or ensemble casts?",
            [
                "Strongly prefer solitary protagonists",
                "Prefer small, intimate character groups",
                "Enjoy books with larger ensemble casts",
                "No preference",
            ],
        ),
        choice(
            "q4_writing_style_importance",
            "How important is the writing style to you?",
            [
                "Very important, I value beautiful prose",
                "Somewhat important, but I care more about the story",
                "Not important, I just want a good plot",
                "I prefer straightforward, simple writing",
            ],
        ),
        choice(
            "q5_story_pace",
            "What pace of storytelling do you prefer?",
            [
                "Fast-paced with lots of action",
                "Moderate pace with good balance",
                "Slow, contemplative, and detailed",
                "Varies depending on the genre",
            ],
        ),
        choice(
            "q6_challenging_reads",
            "How do you feel about challenging or difficult reads?",
            [
                "I enjoy being intellectually challenged",
                "I prefer books that make me think occasionally",
                "I read primarily for entertainment, not challenge",
                "I avoid books that require significant effort",
            ],
        ),
        choice(
            "q7_darker_themes_tolerance",
            "What's your tolerance for darker themes?",
            [
                "I enjoy exploring dark, disturbing themes",
                "I can handle darkness if it serves the story",
                "I prefer mostly uplifting content with some challenges",
                "I strongly prefer positive, uplifting content",
            ],
        ),
        choice(
            "q8_diverse_perspectives_importance",
            "How important are diverse perspectives in your reading?",
            [
                "Very important, I actively seek diverse voices",
                "Somewhat important, but not my primary concern",
                "I'm neutral about it",
                "Not a factor in my book selection",
            ],
        ),
        choice(
            "q9_multiple_perspectives_enjoyment",
            "Do you enjoy books with multiple perspectives/narrators?",
            [
                "Yes, I love seeing different viewpoints",
                "Sometimes, if well-executed",
                "I prefer a single consistent narrator",
                "No, multiple perspectives confuse me",
            ],
        ),
        choice(
            "q10_ambiguous_endings_feeling",
            "How do you feel about ambiguous endings?",
            [
                "I love them - they make me think",
                "I can appreciate them in certain books",
                "I prefer closure but can handle some ambiguity",
                "I strongly prefer clear resolution",
            ],
        ),
        free_response(
            "q11_frq_favorite_book",
            "What is the name of your favorite book?",
            "e.g., 'Pride and Prejudice', 'Dune', 'The Secret History'... don't be shy!",
        ),
        free_response(
            "q12_frq_enjoyable_themes",
            "What themes or topics do you most enjoy exploring in books?",
            "Think 'found family', 'dystopian societies', 'magical realism', 'coming-of-age angst', etc.",
        ),
        free_response(
            "q13_frq_interesting_setting",
            "Is there a time period or setting that particularly interests you?",
            "Victorian England? A spaceship? A quiet village with a dark secret? Spill the beans!",
        ),
        free_response(
            "q14_frq_unfinished_book_reason",
            "Name one book you couldn't finish and explain why.",
            "'Moby Dick - too many whale facts!' or 'That popular sci-fi... just didn't click.' No judgment!",
        ),
        free_response(
            "q15_frq_desired_emotions",
            "What emotions do you hope to experience when reading?",
            "Joy? Suspense? A good cry? Intellectual stimulation? Tell me everything!",
        ),
        free_response(
            "q16_frq_avoided_topics",
            "Do you have any topics or content you prefer to avoid in books?",
            "This helps us steer clear! e.g., 'Excessive gore', 'animal cruelty', 'love triangles'...",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_survey_shape() {
        let questions = survey_questions();
        assert_eq!(questions.len(), 16);
        assert_eq!(
            questions.iter().filter(|q| q.kind == QuestionKind::Mcq).count(),
            10
        );

        let ids: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), questions.len());
    }

    #[test]
    fn test_choice_questions_have_options() {
        for q in survey_questions() {
            match q.kind {
                QuestionKind::Mcq => assert_eq!(q.options.as_ref().map(Vec::len), Some(4)),
                QuestionKind::Frq => assert!(q.options.is_none()),
            }
        }
    }

    #[test]
    fn test_question_kind_serialization() {
        assert_eq!(serde_json::to_string(&QuestionKind::Mcq).unwrap(), "\"mcq\"");
        assert_eq!(QuestionKind::Frq.label(), "FRQ");
    }

    #[test]
    fn test_question_wire_format() {
        let json = r#"{"id":"q1","type":"mcq","question":"Pick one","options":["a","b"],"allowMultiple":true}"#;
        let q: SurveyQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Mcq);
        assert_eq!(q.allow_multiple, Some(true));

        let back = serde_json::to_value(&q).unwrap();
        assert_eq!(back["type"], "mcq");
        assert!(back.get("placeholder").is_none());
    }

    #[test]
    fn test_answer_accepts_string_or_list() {
        let answers: AnswerSet =
            serde_json::from_str(r#"{"q1":"Somewhat social","q2":["a","b"]}"#).unwrap();
        assert_eq!(answers["q1"], Answer::Single("Somewhat social".to_string()));
        assert_eq!(answers["q2"].to_prompt_text(), "a, b");
    }
}
