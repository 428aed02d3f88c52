use serde_json::Value;

/// Sanitizes sensitive fields in JSON payloads for logging
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "signature_key"
            | "server_key"
            | "password"
            | "secret"
            | "token"
            | "api_key"
            | "authorization"
    )
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.chars().count() > 8 => {
            let visible: String = s.chars().take(4).collect();
            let end: String = s.chars().skip(s.chars().count() - 4).collect();
            Value::String(format!("{}****{}", visible, end))
        }
        _ => Value::String("****".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_signature_key() {
        let input = json!({
            "order_id": "ORD-1",
            "signature_key": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
            "gross_amount": "10000.00"
        });

        let sanitized = sanitize_json(&input);
        let signature = sanitized["signature_key"].as_str().unwrap();

        assert!(signature.contains("****"));
        assert!(signature.len() < 16);
        assert_eq!(sanitized["order_id"], "ORD-1");
        assert_eq!(sanitized["gross_amount"], "10000.00");
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "config": {
                "server_key": "short",
                "name": "storefront"
            }
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["config"]["server_key"], "****");
        assert_eq!(sanitized["config"]["name"], "storefront");
    }
}
