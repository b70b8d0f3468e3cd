//! Script text handling.
//!
//! A script is a plain text string played back one token at a time.
//! Tokens are whitespace-delimited; empty fragments never survive
//! tokenization. The `EditBuffer` holds a working copy of the script
//! while edit mode is active.

/// Split a script into its ordered token sequence.
///
/// Splits on runs of whitespace and discards empty fragments. An empty
/// or whitespace-only script yields an empty sequence; that is the only
/// "failure" mode.
///
/// # Arguments
/// * `script` - The raw script text
pub fn tokenize(script: &str) -> Vec<String> {
    script.split_whitespace().map(str::to_string).collect()
}

/// A script together with its derived token sequence.
///
/// The token sequence is re-derived whenever the script text is
/// replaced; the two never go out of sync.
#[derive(Debug, Clone)]
pub struct Script {
    text: String,
    tokens: Vec<String>,
}

impl Script {
    /// Build a script from raw text, deriving its tokens.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    /// The raw script text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The derived token sequence.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// True when the script has no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Working copy of the script text used while edit mode is active.
///
/// Created by `enter`, discarded by cancel (drop), and consumed on
/// commit. Committing blank text is ignored by the caller; the buffer
/// itself only reports whether its content is blank.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    text: String,
}

impl EditBuffer {
    /// Open an edit buffer seeded with the current script text.
    pub fn enter(script: &Script) -> Self {
        Self {
            text: script.text().to_string(),
        }
    }

    /// Current buffer content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the buffer content wholesale.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Append a character to the buffer.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove the last character, if any.
    pub fn pop(&mut self) {
        self.text.pop();
    }

    /// True when the buffer holds no non-whitespace content.
    ///
    /// A blank buffer must never replace the existing script.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
