//! Schemas shared across the integration suites.

#![allow(dead_code)]

use modelkit::{props, Computed, ModelSchema, Mutations, Props, Value};

/// Person: a trimming mutation on `name` and a computed `summary`.
pub struct Person;

impl ModelSchema for Person {
    fn defaults() -> Props {
        props! { "id": null, "name": null, "age": 0 }
    }

    fn mutations() -> Mutations<Self> {
        Mutations::new().with("name", |_, value| match value {
            Value::String(s) => Value::from(s.trim().to_string()),
            other => other,
        })
    }

    fn computed() -> Computed<Self> {
        Computed::new().with("summary", |model| {
            let name = model.get("name").and_then(Value::as_str).unwrap_or("?");
            let age = model.get("age").and_then(Value::as_i64).unwrap_or(0);
            Value::from(format!("{} ({})", name, age))
        })
    }

    fn class_name() -> String {
        "Person".to_string()
    }
}

/// Task: plain fields, no mutations or computed properties.
pub struct Task;

impl ModelSchema for Task {
    fn defaults() -> Props {
        props! { "id": null, "title": null, "done": false }
    }

    fn class_name() -> String {
        "Task".to_string()
    }
}
