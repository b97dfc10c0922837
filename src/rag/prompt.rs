//! Prompt assembly for the retrieval-augmented mode.

/// What the model is told to say when the context has no answer.
pub const FALLBACK_PHRASE: &str = "I don't have information on that.";

/// System message used by the system-prompted mode.
pub const SYSTEM_PROMPT: &str =
    "You are a concise, knowledgeable assistant. Keep answers short and factual.";

/// Merges retrieved documents and the user query into one model-ready
/// instruction. The context section is omitted entirely when `context_docs`
/// is empty; the query is carried verbatim. The no-answer directive quotes
/// [`FALLBACK_PHRASE`].
pub fn compose(query: &str, context_docs: &[String]) -> String {
    let mut prompt = format!(
        "You are a helpful assistant. Answer the user's question using the \
         provided context. If the context does not contain the answer, say \
         \"{FALLBACK_PHRASE}\""
    );

    if !context_docs.is_empty() {
        prompt.push_str("\n\nContext:");
        for doc in context_docs {
            prompt.push_str("\n- ");
            prompt.push_str(doc);
        }
    }

    prompt.push_str("\n\nQuestion: ");
    prompt.push_str(query);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_context_as_ranked_bullets() {
        let docs = vec!["first fact".to_string(), "second fact".to_string()];

        let prompt = compose("what is up?", &docs);

        let first = prompt.find("- first fact").unwrap();
        let second = prompt.find("- second fact").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Context:"));
        assert!(prompt.ends_with("Question: what is up?"));
    }

    #[test]
    fn empty_context_omits_the_section() {
        let prompt = compose("what is up?", &[]);

        assert!(!prompt.contains("Context:"));
        assert!(!prompt.contains("- "));
        assert!(prompt.ends_with("Question: what is up?"));
    }

    #[test]
    fn query_is_carried_verbatim() {
        let query = "Does \"quoting\" survive?  with   spacing";

        let prompt = compose(query, &[]);

        assert!(prompt.contains(query));
    }

    #[test]
    fn instruction_quotes_the_fallback_phrase() {
        let prompt = compose("anything", &[]);

        assert!(prompt.contains(&format!("say \"{FALLBACK_PHRASE}\"")));
    }
}
