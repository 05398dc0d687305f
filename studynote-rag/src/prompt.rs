//! Prompt assembly for summaries, answers and quizzes.

/// Placeholder used in place of an empty context block.
pub const NO_CONTENT: &str = "No content available.";

/// Render passages as a numbered context block.
///
/// Each passage becomes `\nContent i:\n<text>\n` (1-indexed, order kept) and
/// the passages are joined with `\n`. An empty slice renders as `""`.
///
/// ```rust
/// use studynote_rag::prompt::build_context;
///
/// assert_eq!(build_context::<&str>(&[]), "");
/// assert_eq!(build_context(&["a", "b"]), "\nContent 1:\na\n\n\nContent 2:\nb\n");
/// ```
pub fn build_context<T: AsRef<str>>(passages: &[T]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, passage)| format!("\nContent {}:\n{}\n", i + 1, passage.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`build_context`], or [`NO_CONTENT`] when there are no passages.
pub fn context_or_placeholder<T: AsRef<str>>(passages: &[T]) -> String {
    if passages.is_empty() { NO_CONTENT.to_string() } else { build_context(passages) }
}

/// System instruction for the one-off document summary.
///
/// The sentence cap is a request to the model, not something checked here.
pub fn summary_instruction(context: &str) -> String {
    format!(
        "Generate a summary of the following notebook content: \n\n###\n{context}\n###\n\n\
         The summary should contain the title of the notebook and a short sentence about the notebook. \
         The summary should never be more than 8 sentences. \
         Be precise, avoid opinions, and summarize the main points in a clear and structured way. \
         If the document has multiple sections, break it into meaningful segments."
    )
}

/// System instruction for answering a question from retrieved passages.
pub fn answer_instruction(context: &str) -> String {
    format!(
        "You are a professor teaching a course. Use the following notebook content \
         to answer student questions accurately and concisely:\n\n{context}\n\n\
         Be precise and avoid opinions. \
         Only state what is in the notebook content. \
         Do not state what is not in the given notebook and be very precise and straight forward."
    )
}

/// System instruction for a multiple-choice quiz of `num_questions` items.
///
/// The layout described here is the contract [`parse_quiz`](crate::quiz::parse_quiz) reads.
pub fn quiz_instruction(context: &str, num_questions: usize) -> String {
    format!(
        "Generate {num_questions} multiple-choice quiz questions from the following notebook content: \
         \n\n###\n{context}\n###\n\n\
         Each question should have 4 answer choices (A,B,C,D) and indicate the correct answer at the end. \
         Separate questions with a blank line. The format of the reply should be:\n\
         Question 1: <question>\n\
         A) <answer choice A>\n\
         B) <answer choice B>\n\
         C) <answer choice C>\n\
         D) <answer choice D>\n\
         Correct Answer: C\n\
         \n\
         Question 2: <question>\n\
         ..."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    #[test]
    fn single_passage_block() {
        assert_eq!(build_context(&["only"]), "\nContent 1:\nonly\n");
    }

    #[test]
    fn chunks_render_by_text() {
        let chunks = vec![
            Chunk { index: 4, start: 0, text: "first".into() },
            Chunk { index: 9, start: 9, text: "second".into() },
        ];
        let block = build_context(&chunks);
        assert!(block.starts_with("\nContent 1:\nfirst\n"));
        assert!(block.ends_with("\nContent 2:\nsecond\n"));
    }

    #[test]
    fn placeholder_replaces_empty_context() {
        assert_eq!(context_or_placeholder::<String>(&[]), NO_CONTENT);
        assert_eq!(context_or_placeholder(&["x"]), build_context(&["x"]));
    }

    #[test]
    fn instructions_embed_context_and_count() {
        let quiz = quiz_instruction("CTX", 7);
        assert!(quiz.starts_with("Generate 7 multiple-choice quiz questions"));
        assert!(quiz.contains("###\nCTX\n###"));
        assert!(quiz.contains("Correct Answer: C"));

        assert!(summary_instruction("CTX").contains("never be more than 8 sentences"));
        assert!(answer_instruction("CTX").contains("concisely:\n\nCTX\n\n"));
    }
}
