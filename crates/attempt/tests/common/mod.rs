//! Shared helpers for attempt integration tests.

#![allow(dead_code)]

use attempt::{Attempt, Caught, DefaultNormalizer, ErrorLogger};
use std::sync::{Arc, Mutex};

/// Records every call made to the logger and reporter, in order.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl ErrorLogger for Journal {
    fn error(&self, caught: &Caught) {
        self.push(format!("logger: {}", caught.message()));
    }
}

/// An attempt runner whose logger and reporter both write to the returned journal.
pub fn journaled() -> (Attempt<DefaultNormalizer>, Journal) {
    let journal = Journal::default();
    let reporter = journal.clone();
    let attempt = Attempt::builder(DefaultNormalizer::new())
        .logger(journal.clone())
        .reporter(move |caught| reporter.push(format!("reporter: {}", caught.message())))
        .build();
    (attempt, journal)
}

/// Sorted keys of a JSON object.
pub fn keys(value: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}
