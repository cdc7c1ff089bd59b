//! W3C WebDriver wire types.
//!
//! Every WebDriver response wraps its payload in `{"value": ...}`; errors
//! put an `{error, message}` object in the same place.

use serde::{Deserialize, Serialize};

/// Element reference key defined by W3C WebDriver.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
}

/// Error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Payload of a successful `POST /session`.
#[derive(Debug, Deserialize)]
pub struct NewSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// An element handle returned by element lookups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

/// Body of `POST /session/{id}/elements`.
#[derive(Debug, Serialize)]
pub struct FindElements<'a> {
    pub using: &'a str,
    pub value: &'a str,
}

/// Body of `POST /session/{id}/url`.
#[derive(Debug, Serialize)]
pub struct NavigateTo<'a> {
    pub url: &'a str,
}

/// Body of `POST /session/{id}/element/{eid}/value`.
#[derive(Debug, Serialize)]
pub struct SendKeys<'a> {
    pub text: &'a str,
}

/// Body of `POST /session/{id}/execute/sync`.
#[derive(Debug, Serialize)]
pub struct ExecuteScript<'a> {
    pub script: &'a str,
    pub args: Vec<serde_json::Value>,
}

/// Body of `POST /session/{id}/timeouts`, in milliseconds.
#[derive(Debug, Serialize)]
pub struct Timeouts {
    #[serde(rename = "pageLoad")]
    pub page_load: u64,
}

/// Page state reported by the quiescence probe script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageActivity {
    #[serde(rename = "readyState")]
    pub ready_state: ReadyState,
    /// Number of resource loads the page has started so far.
    pub resources: u64,
}

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_new_session() {
        let json = r#"{"value":{"sessionId":"abc123","capabilities":{"browserName":"chrome"}}}"#;
        let env: Envelope<NewSession> = serde_json::from_str(json).unwrap();
        assert_eq!(env.value.session_id, "abc123");
    }

    #[test]
    fn parse_element_list() {
        let json = format!(r#"{{"value":[{{"{ELEMENT_KEY}":"e1"}},{{"{ELEMENT_KEY}":"e2"}}]}}"#);
        let env: Envelope<Vec<ElementRef>> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            env.value,
            vec![
                ElementRef { id: "e1".into() },
                ElementRef { id: "e2".into() }
            ]
        );
    }

    #[test]
    fn parse_error_value() {
        let json = r#"{"value":{"error":"no such element","message":"Unable to locate","stacktrace":""}}"#;
        let env: Envelope<ErrorValue> = serde_json::from_str(json).unwrap();
        assert_eq!(env.value.error, "no such element");
        assert_eq!(env.value.message, "Unable to locate");
    }

    #[test]
    fn parse_page_activity() {
        let json = r#"{"value":{"readyState":"complete","resources":12}}"#;
        let env: Envelope<PageActivity> = serde_json::from_str(json).unwrap();
        assert_eq!(env.value.ready_state, ReadyState::Complete);
        assert_eq!(env.value.resources, 12);
    }

    #[test]
    fn serialize_bodies() {
        let body = serde_json::to_value(FindElements {
            using: "xpath",
            value: "//button",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"using": "xpath", "value": "//button"}));

        let body = serde_json::to_value(Timeouts { page_load: 60000 }).unwrap();
        assert_eq!(body, serde_json::json!({"pageLoad": 60000}));
    }
}
