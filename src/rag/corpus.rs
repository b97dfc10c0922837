//! The built-in document set the retriever searches over.

/// Short factual sentences compiled into the binary. Embedded once at
/// startup; the index is rebuilt from scratch whenever this list changes.
pub const CORPUS: &[&str] = &[
    "The capital of France is Paris.",
    "The Eiffel Tower is located in Paris.",
    "Mount Everest is the tallest mountain in the world.",
    "The Pacific Ocean is the largest ocean on Earth.",
    "Python is a popular programming language for data science.",
    "Rust is a systems programming language focused on safety.",
    "The Great Wall of China stretches for thousands of kilometers.",
    "Groq provides fast inference for large language models.",
];

pub fn documents() -> Vec<String> {
    CORPUS.iter().map(|text| text.to_string()).collect()
}
