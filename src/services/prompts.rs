//! Prompt rendering for the selection and reasoning calls

use rand::{seq::SliceRandom, Rng};

use crate::models::{AnswerSet, BookRecord, SurveyQuestion, Tab};

/// Words of a description included per book in the reasoning prompt
pub const SNIPPET_WORDS: usize = 35;

/// Upper bound on books per tab requested from the selection call
pub const MAX_BOOKS_PER_TAB: usize = 10;

/// A selected book as presented to the reasoning call
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningCandidate {
    pub title: String,
    pub author: String,
    pub description: String,
    /// Exact identifier the model must key its justification by
    pub identifier: String,
}

/// One block per answered question, in survey order
pub fn format_answers(questions: &[SurveyQuestion], answers: &AnswerSet) -> String {
    questions
        .iter()
        .filter_map(|q| {
            answers.get(&q.id).map(|answer| {
                format!(
                    "Question ({}): {}\nAnswer: {}",
                    q.kind.label(),
                    q.question,
                    answer.to_prompt_text()
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// "Title by Author" for every catalog book, in random order
///
/// Shuffled so the model's picks do not track catalog (rank) order.
pub fn shuffled_identifiers<R: Rng + ?Sized>(catalog: &[BookRecord], rng: &mut R) -> Vec<String> {
    let mut identifiers: Vec<String> = catalog.iter().map(BookRecord::identifier).collect();
    identifiers.shuffle(rng);
    identifiers
}

/// First `SNIPPET_WORDS` words of a description, with an ellipsis when clipped
pub fn description_snippet(description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().collect();
    if words.len() > SNIPPET_WORDS {
        format!("{}...", words[..SNIPPET_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

pub fn selection_prompt(answers_text: &str, identifiers: &[String]) -> String {
    let book_list = serde_json::to_string(identifiers).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a highly knowledgeable and insightful book recommendation system.
Your goal is to help a student discover books they will genuinely enjoy and also suggest some books that might broaden their literary horizons, based on their survey responses.
Your audience is US 9th graders in Honors English class.

Here are the student's responses to a survey about their reading preferences:
--- START STUDENT RESPONSES ---
{answers_text}
--- END STUDENT RESPONSES ---

Here is a list of available books you can recommend from. Each book is a string in the format "TITLE by AUTHOR":
--- START AVAILABLE BOOKS ---
{book_list}
--- END AVAILABLE BOOKS ---

Based on all the information, please provide book recommendations.
Recommendation tips:
- Listen closely to FRQ answers. They mean more to students than MCQ responses.
- Don't recommend a book that the student has already read.
- You don't need to follow all preferences in each suggestion.
- For variation in your recommendations, prefer fully following subsets of preferences.
- Be bold! in "differentTaste" recommendations.
- Any book from the list is fine! As long as it's a good fit. Feel free to recommend niche, not-as-popular books.
- Aim for a chunk of books to be less known.

For the "differentTaste" category, first internally select a random subset of approximately 1/4 of the "AVAILABLE BOOKS". Then, make your recommendations for "differentTaste" *only* from this smaller internal subset. The "likelyToEnjoy" category should still consider all "AVAILABLE BOOKS".

You MUST respond with a JSON object. The JSON object must have exactly two top-level keys: "likelyToEnjoy" and "differentTaste".
Each of these keys must correspond to an array of book recommendation objects.
Each book recommendation object in these arrays MUST have ONLY the following key:
1.  "bookString": string - The exact "TITLE by AUTHOR" string of the book selected from the provided "AVAILABLE BOOKS" list.

Do NOT include a "reasoning" key in this response.
Provide up to {max} books for "likelyToEnjoy", ranked in order of most likely enjoyment.
Provide up to {max} books for "differentTaste", also ranked.
Do not include any books in your response that are not in the "AVAILABLE BOOKS" list.
Ensure the "bookString" field in your response exactly matches one of the entries in the "AVAILABLE BOOKS" list.
Do not add any extra text or explanation outside of the JSON object.
Your entire response should be a single, valid JSON object."#,
        max = MAX_BOOKS_PER_TAB,
    )
}

struct TabVoice {
    instructions: &'static str,
    opening_phrase: &'static str,
    narrative_template: &'static str,
}

fn tab_voice(tab: Tab) -> TabVoice {
    match tab {
        Tab::LikelyToEnjoy => TabVoice {
            instructions: r#"For each book, sell it to the student. Focus on specific, concrete nuggets from the book that align directly with their stated preferences or previous positive experiences mentioned in their survey responses. Frame each reasoning as "Why you'll love this book: [reasoning]"."#,
            opening_phrase: "Why you'll love this book:",
            narrative_template: "Based on your survey responses, your preferences appear to align with [ADAPTIVE SUMMARY OF PREFERENCES - e.g., intellectually stimulating narratives, perhaps with a focus on character-driven stories or specific thematic elements]. The following selections have been chosen with these aspects in mind.",
        },
        Tab::DifferentTaste => TabVoice {
            instructions: r#"For each book, highlight specific, concrete aspects that could offer a surprising new perspective, a unique learning opportunity, or an unexpected appeal that might challenge their current tastes positively. Frame each reasoning as "Why this book might surprise you: [reasoning]" or "Why you'll like this book more than you think: [reasoning]"."#,
            opening_phrase: "Why this book might surprise you:",
            narrative_template: "To help broaden your literary horizons, these selections, while resonating with some of your stated preferences such as [ADAPTIVE SUMMARY - e.g., engaging plots or familiar genres], also introduce new elements like [ADAPTIVE EXAMPLES - e.g., different narrative styles, thematic explorations, or genres] that you might find unexpectedly compelling.",
        },
    }
}

pub fn reasoning_prompt(answers_text: &str, books: &[ReasoningCandidate], tab: Tab) -> String {
    let voice = tab_voice(tab);
    let book_list = books
        .iter()
        .map(|b| {
            format!(
                "- \"{}\" by {} [key: \"{}\"] (Key info: {})",
                b.title,
                b.author,
                b.identifier,
                description_snippet(&b.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"A student provided the following survey responses about their reading preferences:
--- START STUDENT RESPONSES ---
{answers_text}
--- END STUDENT RESPONSES ---

You are recommending a set of books for this student under the category: "{heading}".
Your tone should be that of an insightful and engaging literary companion: knowledgeable, friendly, and subtly enthusiastic.

Your first task is to analyze the student's responses and identify a primary literary genre that best reflects their tastes. This should be a recognizable genre category. Examples include: "Classic Psychological Fiction," "Modern Dystopian Literature," "Character-Driven Historical Drama," "Fast-Paced Sci-Fi Adventure," or "Literary Fantasy with Complex World-Building."

Your second task is to generate an engaging overall narrative for this category. This narrative should incorporate the primary literary genre you just identified.
It should start with "**Primary Genre Focus: [Generated Primary Literary Genre]**."
Then, on a new line, continue with a paragraph that thoughtfully summarizes why this collection of books is being presented, using the following template and adapting it intelligently to the student's specific responses:
"{narrative}"

Next, for each book in the list below, your task is to provide a BRIEF (1-2 tight sentences, ABSOLUTE MAXIMUM 40 words per reasoning) and UNIQUE justification.
The student already has access to the full title, author, and general summary for each book. DO NOT repeat these elements in your reasoning.

Here are the books in this set:
{book_list}

The primary goal for individual book reasonings is to make each distinct and compelling, helping the student differentiate effectively.
Focus on CONCRETE details, evocative questions, or intriguing specific aspects of each book. Avoid vague adjectives or generic themes.
Make the reasoning specific to *this student's* survey responses. Hook the reader with tone and specificity.

{instructions}

IMPORTANT STYLE GUIDELINES (for individual book reasonings):
- Each reasoning MUST be unique to its book and distinct from others in this batch.
- Start each reasoning *directly* with the suggested framing phrase (e.g., "{opening} ...").
- Do NOT reiterate the book's title or author in the reasoning itself.
- Be succinct and impactful. Sacrifice generality for specificity.
- Ensure your reasoning for one book doesn't sound like it could apply to another book in the list.
- Aim to be an insightful guide for a 9th-grade Honors English student.
- Use rhetorical devices thoughtfully: rhetorical questions, parallelisms, anastrophe, etc.
- Maintain an engaging, knowledgeable, and subtly enthusiastic tone.
- What specific preferences in the student's responses led to this recommendation? As a student I want to know why you recommended this book!
- Remember: Listen closely to FRQ answers. They mean more to students than MCQ responses.

OUTPUT FORMAT:
You MUST respond with a single JSON object. This object must have exactly two top-level keys:
1. "overallStatement": string - This string must begin with "**Primary Genre Focus: [Generated Primary Literary Genre]**.", followed by a newline character (\n), and then the longer narrative paragraph you generated.
2. "bookReasonings": object - This object should map each book's exact key string (shown as [key: "..."] in the input book list) to its unique, concrete reasoning string (max 40 words, following style guidelines).

Example JSON structure:
{{
  "overallStatement": "Primary Genre Focus: Classic Detective Fiction.\nBased on your enjoyment of intricate plots and historical settings, these classic detective novels offer a wealth of suspense and clever deduction for you to explore.",
  "bookReasonings": {{
    "Book One Title by Author A": "{opening} [Unique, concrete, and evocative reasoning for Book One...]",
    "Book Two Title by Author B": "{opening} [Unique, concrete, and evocative reasoning for Book Two...]"
  }}
}}
Ensure the keys in the "bookReasonings" object exactly match the key strings of the books.
Your entire response must be only this JSON object."#,
        heading = tab.heading(),
        narrative = voice.narrative_template,
        instructions = voice.instructions,
        opening = voice.opening_phrase,
    )
}
