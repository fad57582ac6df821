//! Markdown to HTML conversion.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Result of rendering a page body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Plain text of the first H1 heading, if any.
    pub title: Option<String>,
}

/// Markdown renderer used for page bodies.
///
/// The first H1 is captured as a title but still rendered.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with tables, strikethrough, footnotes, task lists
    /// and math enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_MATH,
        }
    }

    /// Render markdown to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();
        let title = first_h1(&events);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        RenderResult { html: out, title }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain text of the first level-1 heading.
fn first_h1(events: &[Event<'_>]) -> Option<String> {
    let mut in_h1 = false;
    let mut text = String::new();

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = text.trim();
                return (!title.is_empty()).then(|| title.to_owned());
            }
            Event::Text(t) | Event::Code(t) | Event::InlineMath(t) if in_h1 => text.push_str(t),
            Event::SoftBreak | Event::HardBreak if in_h1 => text.push(' '),
            _ => {}
        }
    }
    None
}
