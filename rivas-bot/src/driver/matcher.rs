//! Element matchers and the actions performed on matched elements.

use std::fmt;

/// ARIA role used for role-based lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Button,
    Link,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
        }
    }
}

/// Describes how to find an element on the page.
///
/// Matchers are declarative; each driver translates them into its own
/// lookup mechanism. When several elements match, drivers use the first
/// visible one in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Element whose whitespace-normalised text equals the string.
    ExactText(String),
    /// Element whose text contains the string.
    TextContains(String),
    /// Form control whose label contains the string.
    Label(String),
    /// Element with an ARIA role and accessible name.
    Role { role: Role, name: String },
    /// Raw CSS selector.
    Css(String),
}

impl Matcher {
    pub fn exact_text(text: impl Into<String>) -> Self {
        Matcher::ExactText(text.into())
    }

    pub fn text_contains(text: impl Into<String>) -> Self {
        Matcher::TextContains(text.into())
    }

    pub fn label(text: impl Into<String>) -> Self {
        Matcher::Label(text.into())
    }

    pub fn button(name: impl Into<String>) -> Self {
        Matcher::Role {
            role: Role::Button,
            name: name.into(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Matcher::Css(selector.into())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::ExactText(text) => write!(f, "text=\"{text}\""),
            Matcher::TextContains(text) => write!(f, "text~\"{text}\""),
            Matcher::Label(text) => write!(f, "label~\"{text}\""),
            Matcher::Role { role, name } => write!(f, "role={}[name=\"{name}\"]", role.as_str()),
            Matcher::Css(selector) => write!(f, "css={selector}"),
        }
    }
}

/// What to do with a matched element.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    /// Replace the element's value with the given text.
    Fill(String),
}

// Fill values may be passwords; keep them out of logs.
impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Click => f.write_str("Click"),
            Action::Fill(_) => f.write_str("Fill(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_display() {
        assert_eq!(Matcher::exact_text("20:30").to_string(), "text=\"20:30\"");
        assert_eq!(Matcher::text_contains("Acceder").to_string(), "text~\"Acceder\"");
        assert_eq!(Matcher::label("Usuario").to_string(), "label~\"Usuario\"");
        assert_eq!(
            Matcher::button("Reservar").to_string(),
            "role=button[name=\"Reservar\"]"
        );
        assert_eq!(
            Matcher::css("input[type='password']").to_string(),
            "css=input[type='password']"
        );
    }

    #[test]
    fn fill_value_is_redacted() {
        let action = Action::Fill("hunter2".into());
        assert_eq!(format!("{:?}", action), "Fill(<redacted>)");
        assert_eq!(format!("{:?}", Action::Click), "Click");
    }
}
