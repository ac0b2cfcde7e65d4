//! Fake upstream node served over real HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

/// What the fake node answers for one `(method, first param)` pair.
#[derive(Clone)]
pub enum Reply {
    /// 200 with `result`
    Result(Value),
    /// Envelope with a populated `error`, sent with the given status
    Error { status: u16, error: Value },
    /// Arbitrary body, not necessarily JSON
    Raw { status: u16, body: &'static str },
    /// Sleep before answering with `result`
    Slow(Duration, Value),
}

#[derive(Default)]
struct State {
    replies: HashMap<(String, String), Reply>,
    requests: Mutex<Vec<Value>>,
}

pub struct FakeNode {
    pub url: String,
    state: Arc<State>,
    handle: ServerHandle,
}

pub fn txid(n: u8) -> String {
    format!("{:064x}", n)
}

fn key(param: &Value) -> String {
    match param {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn handle(body: web::Json<Value>, state: web::Data<Arc<State>>) -> HttpResponse {
    let body = body.into_inner();
    state.requests.lock().unwrap().push(body.clone());

    let method = body["method"].as_str().unwrap_or_default().to_string();
    let id = body["id"].clone();
    let reply = state.replies.get(&(method, key(&body["params"][0]))).cloned();

    match reply {
        Some(Reply::Result(result)) => {
            HttpResponse::Ok().json(json!({ "result": result, "error": null, "id": id }))
        }
        Some(Reply::Slow(delay, result)) => {
            actix_web::rt::time::sleep(delay).await;
            HttpResponse::Ok().json(json!({ "result": result, "error": null, "id": id }))
        }
        Some(Reply::Error { status, error }) => {
            HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap())
                .json(json!({ "result": null, "error": error, "id": id }))
        }
        Some(Reply::Raw { status, body }) => {
            HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap())
                .content_type("text/html")
                .body(body)
        }
        None => HttpResponse::Ok().json(json!({
            "result": null,
            "error": { "code": -5, "message": "No such mempool or blockchain transaction" },
            "id": id,
        })),
    }
}

#[derive(Default)]
pub struct FakeNodeBuilder {
    replies: HashMap<(String, String), Reply>,
}

impl FakeNodeBuilder {
    pub fn reply(mut self, method: &str, first_param: impl Into<String>, reply: Reply) -> Self {
        self.replies
            .insert((method.to_string(), first_param.into()), reply);
        self
    }

    /// Register a verbose `getrawtransaction` answer.
    pub fn tx(self, id: String, inputs: &[(String, u32)], outputs: &[f64]) -> Self {
        let vin: Vec<Value> = inputs
            .iter()
            .map(|(prev, vout)| json!({ "txid": prev, "vout": vout, "sequence": 4294967295u32 }))
            .collect();
        let vout: Vec<Value> = outputs
            .iter()
            .enumerate()
            .map(|(n, value)| json!({ "value": value, "n": n }))
            .collect();
        let result = json!({ "txid": id, "vin": vin, "vout": vout });
        self.reply("getrawtransaction", id, Reply::Result(result))
    }

    pub async fn start(self) -> FakeNode {
        let state = Arc::new(State {
            replies: self.replies,
            requests: Mutex::new(Vec::new()),
        });
        let data = web::Data::new(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/", web::post().to(handle))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        FakeNode {
            url: format!("http://{addr}/"),
            state,
            handle,
        }
    }
}

impl FakeNode {
    pub fn builder() -> FakeNodeBuilder {
        FakeNodeBuilder::default()
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// A URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}
