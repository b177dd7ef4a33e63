//! Test doubles and common utilities for reconciler contract tests

#![allow(dead_code)]

use clouddns_core::error::{Error, Result};
use clouddns_core::{Record, Recorder, ZoneDescriptor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What `lookup` should answer
#[derive(Debug, Clone)]
pub enum LookupScript {
    /// Record present with this content
    Found(Record),
    /// Record absent
    NotFound,
    /// Any other backend failure, with this message
    Fail(String),
}

/// What `create` / `replace` should answer
#[derive(Debug, Clone)]
pub enum WriteScript {
    Ok,
    Fail(String),
}

/// A Recorder that answers from a script and counts every call
#[derive(Clone)]
pub struct ScriptedRecorder {
    zone: ZoneDescriptor,
    lookup: LookupScript,
    create: WriteScript,
    replace: WriteScript,
    lookup_calls: Arc<Mutex<Vec<(String, String)>>>,
    created: Arc<Mutex<Vec<Record>>>,
    replaced: Arc<Mutex<Vec<Record>>>,
    total_calls: Arc<AtomicUsize>,
}

impl ScriptedRecorder {
    pub fn new(lookup: LookupScript) -> Self {
        Self {
            zone: test_zone(),
            lookup,
            create: WriteScript::Ok,
            replace: WriteScript::Ok,
            lookup_calls: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            replaced: Arc::new(Mutex::new(Vec::new())),
            total_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create = WriteScript::Fail(message.to_string());
        self
    }

    pub fn failing_replace(mut self, message: &str) -> Self {
        self.replace = WriteScript::Fail(message.to_string());
        self
    }

    /// (key, type) pairs passed to lookup()
    pub fn lookup_calls(&self) -> Vec<(String, String)> {
        self.lookup_calls.lock().unwrap().clone()
    }

    /// Records passed to create()
    pub fn created(&self) -> Vec<Record> {
        self.created.lock().unwrap().clone()
    }

    /// Records passed to replace()
    pub fn replaced(&self) -> Vec<Record> {
        self.replaced.lock().unwrap().clone()
    }

    /// Number of backend calls of any kind
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    fn answer(script: &WriteScript) -> Result<()> {
        match script {
            WriteScript::Ok => Ok(()),
            WriteScript::Fail(message) => Err(Error::backend("scripted", message.clone())),
        }
    }
}

#[async_trait::async_trait]
impl Recorder for ScriptedRecorder {
    async fn lookup(&self, key: &str, record_type: &str) -> Result<Record> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup_calls
            .lock()
            .unwrap()
            .push((key.to_string(), record_type.to_string()));

        match &self.lookup {
            LookupScript::Found(record) => Ok(record.clone()),
            LookupScript::NotFound => Err(Error::not_found(format!("{} (type: {})", key, record_type))),
            LookupScript::Fail(message) => Err(Error::backend("scripted", message.clone())),
        }
    }

    async fn create(&self, record: &Record) -> Result<()> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(record.clone());
        Self::answer(&self.create)
    }

    async fn replace(&self, record: &Record) -> Result<()> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.replaced.lock().unwrap().push(record.clone());
        Self::answer(&self.replace)
    }

    fn zone(&self) -> &ZoneDescriptor {
        &self.zone
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn test_zone() -> ZoneDescriptor {
    ZoneDescriptor::new("w.uname.link.", "test-project", "w-uname-link")
}

/// The record from the CLI's usage example
pub fn api_record(ip: &str) -> Record {
    Record::new("api.w.uname.link.", "A", vec![ip.to_string()], 60)
}
