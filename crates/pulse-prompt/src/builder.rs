//! Fluent text builder
//!
//! [`PromptBuilder`] assembles line-oriented text piece by piece. It backs the
//! fixed-format blocks (the news digest, labelled fields) that are easier to
//! express as code than as a template.

/// A fluent builder for line-oriented text
///
/// # Examples
///
/// ```
/// use pulse_prompt::PromptBuilder;
///
/// let text = PromptBuilder::new()
///     .line("Fed holds rates")
///     .field("Source", "Reuters")
///     .build();
///
/// assert_eq!(text, "Fed holds rates\nSource: Reuters\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text verbatim
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Append text followed by a newline
    pub fn line(self, content: impl AsRef<str>) -> Self {
        self.text(format!("{}\n", content.as_ref()))
    }

    /// Append a single newline
    pub fn newline(self) -> Self {
        self.text("\n")
    }

    /// Append a `key: value` line
    pub fn field(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.line(format!("{}: {}", key.as_ref(), value.as_ref()))
    }

    /// Append every item through `f`
    pub fn each<I, F>(self, items: I, f: F) -> Self
    where
        I: IntoIterator,
        F: Fn(Self, I::Item) -> Self,
    {
        items.into_iter().fold(self, f)
    }

    /// Concatenate all parts
    pub fn build(self) -> String {
        self.parts.concat()
    }
}
