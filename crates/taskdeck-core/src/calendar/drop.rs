use serde::{Deserialize, Serialize};

/// Data carried by a dragged task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPayload {
    #[serde(alias = "taskId")]
    pub task_id: String,
}

impl DropPayload {
    pub fn new(task_id: impl Into<String>) -> Self {
        DropPayload {
            task_id: task_id.into(),
        }
    }

    /// Parse a drop payload.
    ///
    /// Accepts a JSON object with `task_id` (or `taskId`) or a bare task id.
    /// Returns `None` for empty input, invalid JSON objects and empty ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let payload = if raw.starts_with('{') || raw.starts_with('[') || raw.starts_with('"') {
            match serde_json::from_str::<DropPayload>(raw) {
                Ok(payload) => payload,
                Err(_) => DropPayload::new(serde_json::from_str::<String>(raw).ok()?),
            }
        } else if raw.chars().any(char::is_whitespace) {
            return None;
        } else {
            DropPayload::new(raw)
        };
        let id = payload.task_id.trim();
        if id.is_empty() {
            None
        } else {
            Some(DropPayload::new(id))
        }
    }

    /// Encode for a drag source.
    pub fn encode(&self) -> String {
        serde_json::json!({ "task_id": self.task_id }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_object() {
        let p = DropPayload::parse(r#"{"task_id":"abc"}"#).unwrap();
        assert_eq!(p.task_id, "abc");
        let p = DropPayload::parse(r#"{"taskId":"xyz"}"#).unwrap();
        assert_eq!(p.task_id, "xyz");
    }

    #[test]
    fn parses_bare_and_quoted_id() {
        assert_eq!(DropPayload::parse("  t-1 ").unwrap().task_id, "t-1");
        assert_eq!(DropPayload::parse(r#""t-2""#).unwrap().task_id, "t-2");
    }

    #[test]
    fn rejects_garbage() {
        assert!(DropPayload::parse("").is_none());
        assert!(DropPayload::parse("{").is_none());
        assert!(DropPayload::parse(r#"{"other":1}"#).is_none());
        assert!(DropPayload::parse(r#"{"task_id":"  "}"#).is_none());
        assert!(DropPayload::parse("two words").is_none());
        assert!(DropPayload::parse("[1,2]").is_none());
    }

    #[test]
    fn encode_parses_back() {
        let p = DropPayload::new("task-9");
        assert_eq!(DropPayload::parse(&p.encode()), Some(p));
    }
}
