//! Minimal canned-response HTTP server for exercising the client

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct RecordedRequest
{   pub method: String
  , pub target: String
  , pub headers: Vec<(String, String)>
  , pub body: String
}

impl RecordedRequest
{   pub fn header(&self, name: &str) -> Option<&str>
    {   self.headers.iter()
          .find(|(k, _)| k.eq_ignore_ascii_case(name))
          .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Route
{   prefix: String
  , status: u16
  , body: String
  , declared_length: Option<usize>
}

pub struct FakeServer
{   pub base_url: String
  , requests: Arc<Mutex<Vec<RecordedRequest>>>
  , _task: tokio::task::JoinHandle<()>
}

impl FakeServer
{   /// Serve `(path prefix, status, body)` routes until dropped
    pub async fn start(routes: &[(&str, u16, &str)]) -> FakeServer
    {   Self::serve(
          routes.iter()
            .map(|(p, s, b)| Route
            {   prefix: p.to_string()
              , status: *s
              , body: b.to_string()
              , declared_length: None
            })
            .collect()
        ).await
    }

    /// One route whose `Content-Length` promises more than `body`,
    /// so the client hits end of file mid-body
    pub async fn start_truncated(
      prefix: &str
    , status: u16
    , body: &str
    , declared_length: usize
    ) -> FakeServer
    {   Self::serve(vec![Route
        {   prefix: prefix.to_string()
          , status
          , body: body.to_string()
          , declared_length: Some(declared_length)
        }]).await
    }

    async fn serve(routes: Vec<Route>) -> FakeServer
    {   let listener = TcpListener::bind("127.0.0.1:0").await
          .expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task_requests = requests.clone();
        let _task = tokio::spawn(async move {
          loop
          {   let Ok((stream, _)) = listener.accept().await else { break };
              let routes = routes.clone();
              let requests = task_requests.clone();
              tokio::spawn(async move {
                handle(stream, routes, requests).await;
              });
          }
        });

        FakeServer
        {   base_url: format!("http://{}", addr)
          , requests
          , _task
        }
    }

    pub fn identity_url(&self) -> String
    {   format!("{}/identity/token", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest>
    {   self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest>
    {   self.requests()
          .into_iter()
          .filter(|r| r.target.starts_with(prefix))
          .collect()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize>
{   buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn handle(
  mut stream: TcpStream
, routes: Arc<Vec<Route>>
, requests: Arc<Mutex<Vec<RecordedRequest>>>
)
{   let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop
    {   let n = match stream.read(&mut chunk).await
        {   Ok(0) | Err(_) => return
          , Ok(n) => n
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf)
        {   break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();
    let headers: Vec<(String, String)> = lines
      .filter_map(|l| l.split_once(':'))
      .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
      .collect();

    let content_length = headers.iter()
      .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
      .and_then(|(_, v)| v.parse::<usize>().ok())
      .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length
    {   let n = match stream.read(&mut chunk).await
        {   Ok(0) | Err(_) => break
          , Ok(n) => n
        };
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    let route = routes.iter().find(|r| target.starts_with(&r.prefix)).cloned();
    requests.lock().unwrap().push(RecordedRequest
    {   method
      , target
      , headers
      , body
    });

    let (status, reply, length) = match route
    {   Some(r) => {
          let length = r.declared_length.unwrap_or(r.body.len());
          (r.status, r.body, length)
        }
      , None => (404, "no route".to_string(), 8)
    };
    let reason = if status == 200 { "OK" } else { "Canned" };
    let response = format!(
      "HTTP/1.1 {} {}\r\n\
       Content-Type: application/json\r\n\
       Content-Length: {}\r\n\
       Connection: close\r\n\
       \r\n\
       {}",
      status, reason, length, reply
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Address nothing listens on
pub async fn refused_base_url() -> String
{   let listener = TcpListener::bind("127.0.0.1:0").await
      .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn credentials(base_url: &str) -> granite_probe::Credentials
{   granite_probe::Credentials
    {   api_key: "test-key".to_string()
      , project_id: "proj-123".to_string()
      , model_id: "ibm/granite-3-8b-instruct".to_string()
      , base_url: base_url.to_string()
    }
}

pub fn config(identity_url: &str) -> granite_probe::ClientConfig
{   granite_probe::ClientConfig
    {   identity_url: identity_url.to_string()
      , timeout_secs: Some(10)
      , ..Default::default()
    }
}

pub const TOKEN_OK: &str
  = r#"{"access_token":"tok-abc","refresh_token":"not_supported","token_type":"Bearer","expires_in":3600,"expiration":1700003600}"#;

pub fn chat_ok(content: &str) -> String
{   serde_json::json!({
      "id": "chat-1",
      "model_id": "ibm/granite-3-8b-instruct",
      "choices": [
        { "index": 0
        , "message": { "role": "assistant", "content": content }
        , "finish_reason": "stop"
        }
      ]
    }).to_string()
}
