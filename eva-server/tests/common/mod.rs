//! In-memory collaborators and request helpers for router tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::Notify;
use tower::ServiceExt;

use eva_client::gateway::GatewayMessage;
use eva_client::{Backend, ClientError, ClientResult, Endpoint, KeySetSource, Notifier, ProfileSource};
use eva_server::auth::IdTokenVerifier;
use eva_server::{AppState, Config, create_router};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use shared::models::UserProfile;

pub const ADMIN_TOKEN: &str = "admin-access-token";
pub const USER_TOKEN: &str = "user-access-token";
pub const NO_CODE_TOKEN: &str = "no-code-access-token";
pub const ADMIN_CODE: &str = "900001";
pub const USER_CODE: &str = "480011";
pub const ORIGIN: &str = "https://eva.example.test";
pub const ID_TOKEN_AUDIENCE: &str = "eva-console";
pub const ID_TOKEN_KID: &str = "signing-key-1";
const ID_TOKEN_SECRET: &[u8] = b"id-token-signing-secret-for-tests";
const ID_TOKEN_SECRET_B64: &str = "aWQtdG9rZW4tc2lnbmluZy1zZWNyZXQtZm9yLXRlc3Rz";

/// Scripted backend reply
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, String),
}

/// Record store double
///
/// Scripted replies win; the last scripted reply for an endpoint repeats.
/// Without a script, records, directory and saves behave like a small store.
pub struct FakeBackend {
    scripted: Mutex<HashMap<Endpoint, VecDeque<Reply>>>,
    records: Mutex<Vec<Value>>,
    directory: Vec<(String, String)>,
    calls: Mutex<Vec<(Endpoint, Option<Value>)>>,
    hold: Mutex<Option<(Endpoint, Arc<Notify>)>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(HashMap::new()),
            records: Mutex::new(vec![
                json!({
                    "id": 5,
                    "EmplCode": "510001",
                    "FullnameTHEmpl": "สมชาย ใจดี",
                    "MainOrgOrgShort": "ฝกท.",
                    "MainPositionOrgShort": "วศ.5",
                    "CCTR": "CC-100"
                }),
                json!({
                    "id": 6,
                    "EmplCode": "510002",
                    "FullnameTHEmpl": "สมหญิง รักงาน",
                    "MainOrgOrgShort": "ฝกท.",
                    "MainPositionOrgShort": "วศ.4",
                    "CCTR": "CC-100"
                }),
            ]),
            directory: vec![
                ("111".to_string(), "ประเมิน หนึ่ง".to_string()),
                ("222".to_string(), "ประเมิน สอง".to_string()),
                ("333".to_string(), "Evaluator Three".to_string()),
            ],
            calls: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
        })
    }

    pub fn script(&self, endpoint: Endpoint, replies: Vec<Reply>) {
        self.scripted
            .lock()
            .unwrap()
            .insert(endpoint, replies.into_iter().collect());
    }

    /// Makes calls to `endpoint` wait until the returned notify fires
    pub fn hold(&self, endpoint: Endpoint) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some((endpoint, notify.clone()));
        notify
    }

    pub fn calls(&self) -> Vec<(Endpoint, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Option<Value>> {
        self.calls()
            .into_iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, body)| body)
            .collect()
    }

    fn next_scripted(&self, endpoint: Endpoint) -> Option<Reply> {
        let mut scripted = self.scripted.lock().unwrap();
        let queue = scripted.get_mut(&endpoint)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn name_of(&self, code: &str) -> Option<String> {
        self.directory
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.clone())
    }

    fn save(&self, body: &Value) -> Value {
        let id = body["id"].as_i64();
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r["id"].as_i64() == id) else {
            return json!({"success": false, "message": "ไม่พบรายการ"});
        };
        for slot in 1..=3 {
            let code = body[format!("EmplCode_Evaluator{slot}")]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let name = self.name_of(&code).unwrap_or_default();
            record[format!("EmplCode_Evaluator{slot}")] = json!(code);
            record[format!("FullnameTH{slot}")] = json!(name);
        }
        record["EmplCode_AdminUpdate"] = body["EmplCode_AdminUpdate"].clone();
        json!({"success": true})
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn call(&self, endpoint: Endpoint, body: Option<Value>) -> ClientResult<Value> {
        self.calls.lock().unwrap().push((endpoint, body.clone()));

        let held = self
            .hold
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, notify)| notify.clone());
        if let Some(notify) = held {
            notify.notified().await;
        }

        if let Some(reply) = self.next_scripted(endpoint) {
            return match reply {
                Reply::Json(value) => Ok(value),
                Reply::Status(status, message) => Err(ClientError::Backend { status, message }),
            };
        }

        Ok(match endpoint {
            Endpoint::Records | Endpoint::ApprovalRecords => {
                Value::Array(self.records.lock().unwrap().clone())
            }
            Endpoint::Directory => Value::Array(
                self.directory
                    .iter()
                    .map(|(code, name)| json!({"EMPL_CODE": code, "TNAME": name}))
                    .collect(),
            ),
            Endpoint::SaveEvaluators => self.save(&body.unwrap_or_default()),
            Endpoint::Admins => json!([{"EmplCode_Admin": ADMIN_CODE, "FullnameTH_Admin": "ผู้ดูแล ระบบ"}]),
            _ => json!({}),
        })
    }
}

/// Messaging gateway double
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<GatewayMessage>>,
    failure: Mutex<Option<(u16, String)>>,
}

impl FakeNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn sent(&self) -> Vec<GatewayMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, message: &GatewayMessage) -> ClientResult<Value> {
        self.sent.lock().unwrap().push(message.clone());
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => Err(ClientError::Backend { status, message }),
            None => Ok(json!({"success": true})),
        }
    }
}

/// Identity provider double keyed by access token
pub struct FakeProfiles;

#[async_trait]
impl ProfileSource for FakeProfiles {
    async fn fetch_profile(&self, access_token: &str) -> ClientResult<UserProfile> {
        let (id, name, code) = match access_token {
            ADMIN_TOKEN => ("admin-oid", "ผู้ดูแล ระบบ", Some(ADMIN_CODE)),
            USER_TOKEN => ("user-oid", "สมศักดิ์ ทำงาน", Some(USER_CODE)),
            NO_CODE_TOKEN => ("guest-oid", "Guest", None),
            _ => {
                return Err(ClientError::Backend {
                    status: 401,
                    message: "InvalidAuthenticationToken".to_string(),
                });
            }
        };
        Ok(UserProfile {
            id: id.to_string(),
            display_name: name.to_string(),
            employee_id: code.map(str::to_string),
            ..Default::default()
        })
    }
}

/// Identity provider key set with one symmetric key
pub struct FakeKeys;

#[async_trait]
impl KeySetSource for FakeKeys {
    async fn fetch_key_set(&self) -> ClientResult<Value> {
        Ok(json!({"keys": [{"kty": "oct", "kid": ID_TOKEN_KID, "k": ID_TOKEN_SECRET_B64}]}))
    }
}

/// Id token for `oid` signed with `secret`
pub fn sign_id_token_with(secret: &[u8], oid: &str, employee_id: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(ID_TOKEN_KID.to_string());
    let mut claims = json!({
        "sub": format!("{oid}-subject"),
        "oid": oid,
        "aud": ID_TOKEN_AUDIENCE,
        "exp": chrono::Utc::now().timestamp() + 600,
        "name": "From Claims",
    });
    if let Some(code) = employee_id {
        claims["employeeId"] = json!(code);
    }
    encode(&header, &claims, &EncodingKey::from_secret(secret)).unwrap()
}

/// Id token the test identity provider really issued
pub fn id_token(oid: &str, employee_id: Option<&str>) -> String {
    sign_id_token_with(ID_TOKEN_SECRET, oid, employee_id)
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub backend: Arc<FakeBackend>,
    pub notifier: Arc<FakeNotifier>,
}

pub fn test_app() -> TestApp {
    let backend = FakeBackend::new();
    let notifier = FakeNotifier::new();

    let mut config = Config::development();
    config.public_origin = ORIGIN.to_string();
    config.admin_employee_codes.insert(ADMIN_CODE.to_string());

    let state = AppState::with_collaborators(
        config,
        backend.clone(),
        notifier.clone(),
        Arc::new(FakeProfiles),
    )
    .with_id_token_verifier(
        IdTokenVerifier::new(Arc::new(FakeKeys), ID_TOKEN_AUDIENCE)
            .with_algorithms(&[Algorithm::HS256]),
    );
    TestApp {
        router: create_router(state.clone()),
        state,
        backend,
        notifier,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Signs in with an identity provider token and returns the session token
    pub async fn sign_in(&self, access_token: &str) -> String {
        let (status, body) = self
            .post("/api/auth/session", None, json!({"access_token": access_token}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
