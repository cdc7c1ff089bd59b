//! Translation of [`Matcher`]s into WebDriver locators.

use crate::driver::{Matcher, Role};

/// A WebDriver location strategy and its selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub using: &'static str,
    pub value: String,
}

impl Locator {
    fn xpath(value: String) -> Self {
        Self {
            using: "xpath",
            value,
        }
    }

    fn css(value: &str) -> Self {
        Self {
            using: "css selector",
            value: value.to_string(),
        }
    }
}

/// Build the locator for `matcher`.
///
/// Text matchers select the innermost element carrying the text, so a
/// click lands on the cell or button rather than on its container.
pub fn locate(matcher: &Matcher) -> Locator {
    match matcher {
        Matcher::ExactText(text) => {
            let lit = xpath_literal(text);
            Locator::xpath(format!(
                "//*[normalize-space(.)={lit} and not(.//*[normalize-space(.)={lit}])]"
            ))
        }
        Matcher::TextContains(text) => {
            let lit = xpath_literal(text);
            Locator::xpath(format!(
                "//*[contains(normalize-space(.),{lit}) and not(.//*[contains(normalize-space(.),{lit})])]"
            ))
        }
        Matcher::Label(text) => {
            let lit = xpath_literal(text);
            Locator::xpath(format!(
                "//input[@id=//label[contains(normalize-space(.),{lit})]/@for]\
                 | //label[contains(normalize-space(.),{lit})]//input\
                 | //input[contains(@aria-label,{lit})]"
            ))
        }
        Matcher::Role {
            role: Role::Button,
            name,
        } => {
            let lit = xpath_literal(name);
            Locator::xpath(format!(
                "//button[contains(normalize-space(.),{lit})]\
                 | //*[@role='button'][contains(normalize-space(.),{lit})]\
                 | //input[(@type='submit' or @type='button') and contains(@value,{lit})]"
            ))
        }
        Matcher::Role {
            role: Role::Link,
            name,
        } => {
            let lit = xpath_literal(name);
            Locator::xpath(format!(
                "//a[contains(normalize-space(.),{lit})]\
                 | //*[@role='link'][contains(normalize-space(.),{lit})]"
            ))
        }
        Matcher::Css(selector) => Locator::css(selector),
    }
}

/// Quote `s` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so strings containing both quote kinds
/// are split and joined with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }

    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
