use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calbridge_core::{AuthUrlRequest, AuthorizationServer, CredentialRepository};
use calbridge_domain::{CalBridgeError, CredentialRecord, Result, TokenGrant};
use chrono::{DateTime, Utc};

/// HashMap-backed credential store with an injectable failure switch.
#[derive(Default, Clone)]
pub struct InMemoryCredentialRepository {
    records: Arc<Mutex<HashMap<String, CredentialRecord>>>,
    fail: Arc<AtomicBool>,
}

impl InMemoryCredentialRepository {
    pub fn with_record(self, record: CredentialRecord) -> Self {
        self.records.lock().unwrap().insert(record.user_id.clone(), record);
        self
    }

    pub fn record(&self, user_id: &str) -> Option<CredentialRecord> {
        self.records.lock().unwrap().get(user_id).cloned()
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CalBridgeError::Store("database is locked".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn get(&self, user_id: &str) -> Result<Option<CredentialRecord>> {
        self.check()?;
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<()> {
        self.check()?;
        self.records.lock().unwrap().insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        self.check()?;
        self.records.lock().unwrap().remove(user_id);
        Ok(())
    }
}

/// Authorization server returning canned grants and recording calls.
#[derive(Clone)]
pub struct MockAuthorizationServer {
    pub exchange_grant: Arc<Mutex<TokenGrant>>,
    pub refresh_grant: Arc<Mutex<Result<TokenGrant>>>,
    pub refresh_calls: Arc<Mutex<Vec<String>>>,
    pub exchanged_codes: Arc<Mutex<Vec<String>>>,
    pub url_requests: Arc<Mutex<Vec<AuthUrlRequest>>>,
}

impl MockAuthorizationServer {
    pub fn new(expiry: DateTime<Utc>) -> Self {
        Self {
            exchange_grant: Arc::new(Mutex::new(TokenGrant {
                access_token: "exchanged-access".into(),
                refresh_token: Some("exchanged-refresh".into()),
                expiry: Some(expiry),
            })),
            refresh_grant: Arc::new(Mutex::new(Ok(TokenGrant {
                access_token: "refreshed-access".into(),
                refresh_token: None,
                expiry: Some(expiry),
            }))),
            refresh_calls: Arc::default(),
            exchanged_codes: Arc::default(),
            url_requests: Arc::default(),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AuthorizationServer for MockAuthorizationServer {
    fn authorization_url(&self, request: &AuthUrlRequest) -> Result<String> {
        self.url_requests.lock().unwrap().push(request.clone());
        Ok(format!("https://auth.test/authorize?scope={}", request.scopes.join("+")))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        self.exchanged_codes.lock().unwrap().push(code.to_string());
        Ok(self.exchange_grant.lock().unwrap().clone())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.refresh_calls.lock().unwrap().push(refresh_token.to_string());
        self.refresh_grant.lock().unwrap().clone()
    }
}
