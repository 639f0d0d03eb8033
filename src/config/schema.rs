use serde_json::{json, Value};
use std::sync::LazyLock;

pub static SETTINGS_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["inventory"],
        "properties": {
            "inventory": {
                "type": "object",
                "required": ["api_key"],
                "properties": {
                    "api_key": { "type": "string", "minLength": 1 },
                    "base_url": { "type": "string", "format": "uri" },
                    "user_agent": { "type": "string" },
                    "max_retries": { "type": "integer", "minimum": 0 }
                }
            },
            "dry_run": { "type": "boolean" },
            "max_concurrent_scans": { "type": "integer", "minimum": 1 },
            "providers": {
                "type": "array",
                "items": { "$ref": "#/$defs/provider" }
            }
        },
        "$defs": {
            "provider": {
                "type": "object",
                "required": ["provider", "account"],
                "properties": {
                    "provider": { "type": "string", "enum": ["aws", "azure", "gcp", "AWS", "AZURE", "GCP"] },
                    "account": { "type": "string", "minLength": 1 },
                    "regions": { "type": "array", "items": { "type": "string" } },
                    "ignore": { "type": "array", "items": { "type": "string" } },
                    "credentials": {
                        "type": "object",
                        "additionalProperties": { "type": "string" }
                    }
                }
            }
        }
    })
});
