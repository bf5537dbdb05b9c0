//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use serde_json::{Value, json};

/// An Open Library search body with `count` numbered docs.
pub fn numbered_docs_body(count: usize) -> Value {
    let docs: Vec<Value> = (0..count)
        .map(|i| json!({"key": format!("/works/OL{i}W"), "title": format!("Book {i}")}))
        .collect();
    json!({"numFound": count, "start": 0, "docs": docs})
}

/// The single-result response for "dune".
pub fn dune_body() -> Value {
    json!({
        "numFound": 1,
        "start": 0,
        "docs": [{
            "key": "/works/OL1W",
            "title": "Dune",
            "author_name": ["Frank Herbert"],
            "first_publish_year": 1965,
            "edition_count": 300
        }]
    })
}
