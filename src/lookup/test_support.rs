//! Scripted providers for engine tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{IpLookupProvider, ProviderResponse};
use crate::error_handling::ProviderError;

/// What a [`MockProvider`] does when asked to look up an address.
pub(crate) enum Behavior {
    Succeed(Value),
    Fail(ProviderError),
    Empty,
    Panic,
    Hang,
    /// Hangs for the named address, succeeds with the payload otherwise.
    HangOn(&'static str, Value),
}

pub(crate) struct MockProvider {
    name: String,
    behavior: Behavior,
    init_ok: bool,
    available: AtomicBool,
    calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            init_ok: true,
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.init_ok = false;
        self
    }

    pub(crate) fn unavailable(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpLookupProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialise(&self) -> Result<(), ProviderError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(ProviderError::Init("mock init failure".to_string()))
        }
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn lookup(&self, ip: &str) -> Result<Option<ProviderResponse>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(data) => Ok(Some(ProviderResponse::new(ip, data.clone()))),
            Behavior::Fail(err) => Err(err.clone()),
            Behavior::Empty => Ok(None),
            Behavior::Panic => panic!("mock provider panic"),
            Behavior::Hang => std::future::pending().await,
            Behavior::HangOn(slow_ip, _) if *slow_ip == ip => std::future::pending().await,
            Behavior::HangOn(_, data) => Ok(Some(ProviderResponse::new(ip, data.clone()))),
        }
    }
}
