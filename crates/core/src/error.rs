use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::storage::PersistError;

pub type StoryResult<T> = Result<T, StoryError>;

#[derive(Debug, Error, Diagnostic)]
pub enum StoryError {
    #[error("scene synthesis failed: {0}")]
    #[diagnostic(code("story.synthesis"))]
    Synthesis(String),
    #[error("invalid configuration: {0}")]
    #[diagnostic(code("story.config"))]
    Config(String),
    #[error("serialization error: {message}")]
    #[diagnostic(code("story.serialization"))]
    Serialization {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("persistence error: {0}")]
    #[diagnostic(code("story.persist"))]
    Persist(#[from] PersistError),
}

impl StoryError {
    /// Builds a serialization error pointing at the line/column reported by serde_json.
    pub fn from_json(input: &str, err: &serde_json::Error) -> Self {
        let offset = offset_for(input, err.line(), err.column());
        let len = input[offset..].chars().next().map_or(0, char::len_utf8);
        StoryError::Serialization {
            message: err.to_string(),
            src: input.to_string(),
            span: (offset, len).into(),
        }
    }
}

fn offset_for(input: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (idx, text) in input.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let mut col = column.saturating_sub(1).min(text.len());
            while !text.is_char_boundary(col) {
                col -= 1;
            }
            return offset + col;
        }
        offset += text.len();
    }
    input.len()
}
