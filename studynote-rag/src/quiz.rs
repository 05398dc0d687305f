//! Lenient parsing of generated multiple-choice quizzes.
//!
//! The model is asked for blank-line separated blocks of six lines:
//!
//! ```text
//! Question 1: <question>
//! A) <choice>
//! B) <choice>
//! C) <choice>
//! D) <choice>
//! Correct Answer: C
//! ```
//!
//! Model output is not guaranteed to follow that layout, so parsing is
//! best-effort: a block that does not have the shape is skipped, never
//! reported as an error. A reply with fewer usable blocks than requested
//! simply yields fewer items.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// The question line, trimmed (including its `Question n:` prefix).
    pub question: String,
    /// The four choice lines, verbatim.
    pub choices: [String; 4],
    /// The correct choice label, as written after the last colon.
    pub correct: String,
}

/// Parse a generated quiz into the blocks that have the expected shape.
///
/// A block qualifies when it has at least six lines and its first line starts
/// with `question` (case-insensitive). Lines two to five are the choices and
/// the text after the last `:` of line six is the correct label.
pub fn parse_quiz(text: &str) -> Vec<QuizItem> {
    let normalized = text.replace("\r\n", "\n");

    normalized
        .trim()
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let item = parse_block(block);
            if item.is_none() {
                debug!(block, "skipping malformed quiz block");
            }
            item
        })
        .collect()
}

fn parse_block(block: &str) -> Option<QuizItem> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < 6 || !lines[0].to_lowercase().starts_with("question") {
        return None;
    }

    let correct = lines[5].rsplit(':').next().unwrap_or_default().trim();
    Some(QuizItem {
        question: lines[0].trim().to_string(),
        choices: [
            lines[1].to_string(),
            lines[2].to_string(),
            lines[3].to_string(),
            lines[4].to_string(),
        ],
        correct: correct.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Question 1: What is 2 + 2?\n\
                               A) 3\n\
                               B) 4\n\
                               C) 5\n\
                               D) 22\n\
                               Correct Answer: B";

    #[test]
    fn parses_a_well_formed_block() {
        let items = parse_quiz(WELL_FORMED);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "Question 1: What is 2 + 2?");
        assert_eq!(items[0].choices[1], "B) 4");
        assert_eq!(items[0].correct, "B");
    }

    #[test]
    fn skips_blocks_without_question_prefix_or_too_short() {
        let text = format!(
            "Here is your quiz!\n\n{WELL_FORMED}\n\nQuestion 2: Too short?\nA) yes\nB) no\n\n\
             Trivia: not a question\nA) a\nB) b\nC) c\nD) d\nCorrect Answer: A"
        );
        let items = parse_quiz(&text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correct, "B");
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_label_uses_last_colon() {
        let text = "QUESTION: Time?\nA) 1\nB) 2\nC) 3\nD) 4\nCorrect Answer: note: D ";
        let items = parse_quiz(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correct, "D");
    }

    #[test]
    fn choices_are_kept_verbatim() {
        let text = "question 3: Indented?\n  A)  one\nB) two\nC) three\nD) four\nAnswer - C\nextra";
        let items = parse_quiz(text);
        assert_eq!(items[0].choices[0], "  A)  one");
        // No colon on the answer line: the whole line is the label.
        assert_eq!(items[0].correct, "Answer - C");
    }

    #[test]
    fn crlf_output_is_accepted() {
        let text = WELL_FORMED.replace('\n', "\r\n") + "\r\n\r\n" + &WELL_FORMED.replace('\n', "\r\n");
        assert_eq!(parse_quiz(&text).len(), 2);
    }

    #[test]
    fn empty_reply_yields_nothing() {
        assert!(parse_quiz("").is_empty());
        assert!(parse_quiz("\n\n\n").is_empty());
    }
}
