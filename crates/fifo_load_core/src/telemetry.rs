//! Structured log lines, one JSON object per event on stderr.

use serde_json::{json, Value};

pub fn log_info(component: &str, event: &str, details: Value) {
    eprintln!("{}", info_line(component, event, details));
}

pub fn log_error(component: &str, event: &str, details: Value) {
    eprintln!("{}", error_line(component, event, details));
}

fn info_line(component: &str, event: &str, details: Value) -> Value {
    json!({
        "component": component,
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "details": details,
    })
}

fn error_line(component: &str, event: &str, details: Value) -> Value {
    json!({
        "component": component,
        "level": "error",
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "details": details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_carries_level_and_details() {
        let line = error_line("engine", "publish_failed", json!({"index": 3}));

        assert_eq!(line["component"], "engine");
        assert_eq!(line["level"], "error");
        assert_eq!(line["event"], "publish_failed");
        assert_eq!(line["details"]["index"], 3);
        assert!(line["timestamp"].as_str().is_some());
    }

    #[test]
    fn info_line_omits_level() {
        let line = info_line("engine", "progress", json!({}));
        assert!(line.get("level").is_none());
    }
}
