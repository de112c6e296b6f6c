use std::{cell::RefCell, collections::HashMap, time::Duration};

use stencil_cube::resources::{Fetch, ModelSource};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchEvent {
    Start(String),
    End(String),
}

/// In-memory [`ModelSource`] that records when each fetch starts and ends.
#[derive(Default)]
pub struct FakeSource {
    files: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    log: RefCell<Vec<FetchEvent>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), bytes);
        self
    }

    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    pub fn events(&self) -> Vec<FetchEvent> {
        self.log.borrow().clone()
    }

    pub fn fetches(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| matches!(e, FetchEvent::Start(_)))
            .count()
    }
}

impl ModelSource for FakeSource {
    fn fetch<'a>(&'a self, path: &'a str) -> Fetch<'a> {
        Box::pin(async move {
            self.log.borrow_mut().push(FetchEvent::Start(path.to_string()));
            if let Some(delay) = self.delays.get(path) {
                tokio::time::sleep(*delay).await;
            }
            let result = self
                .files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such file: {}", path));
            self.log.borrow_mut().push(FetchEvent::End(path.to_string()));
            result
        })
    }
}
