#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use analyst_core::error::{AnalystError, Result};
use analyst_core::navigation::{Location, Navigator};
use analyst_core::session::{
    AnalyzeReply, AnalyzeRequest, ChatSummary, Message, SessionId, SessionIdMinter, SessionStore,
};

// Mock SessionStore for testing
#[derive(Default)]
pub struct MockSessionStore {
    chats: Mutex<Vec<ChatSummary>>,
    transcripts: Mutex<HashMap<SessionId, Vec<Message>>>,
    replies: Mutex<VecDeque<Result<AnalyzeReply>>>,
    requests: Mutex<Vec<AnalyzeRequest>>,
    fetches: Mutex<Vec<SessionId>>,
    list_calls: AtomicUsize,
    fail_reads: Mutex<bool>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(self, summary: ChatSummary, messages: Vec<Message>) -> Self {
        self.transcripts
            .lock()
            .unwrap()
            .insert(summary.session_id.clone(), messages);
        self.chats.lock().unwrap().push(summary);
        self
    }

    pub fn failing_reads(self) -> Self {
        *self.fail_reads.lock().unwrap() = true;
        self
    }

    pub fn queue_reply(&self, reply: Result<AnalyzeReply>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<AnalyzeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<SessionId> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn read_failure(&self) -> Option<AnalystError> {
        if *self.fail_reads.lock().unwrap() {
            Some(AnalystError::http(Some(500), "store unavailable"))
        } else {
            None
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for MockSessionStore {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn fetch_chat(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        self.fetches.lock().unwrap().push(session_id.clone());
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        Ok(self
            .transcripts
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeReply> {
        let session_id = request.session_id.clone();
        let echo = format!("echo: {}", request.text);
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(AnalyzeReply {
                response: echo,
                plot: None,
                session_id: Some(session_id),
            }),
        }
    }
}

// Deterministic minter that counts how often it was asked
#[derive(Default)]
pub struct CountingMinter {
    minted: AtomicUsize,
}

impl CountingMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.minted.load(Ordering::SeqCst)
    }
}

impl SessionIdMinter for CountingMinter {
    fn mint(&self) -> SessionId {
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        SessionId::parse(format!("minted-{n}")).unwrap()
    }
}

// Navigator that remembers every location it was sent to
pub struct RecordingNavigator {
    current: Location,
    visits: Vec<Location>,
}

impl RecordingNavigator {
    pub fn new(initial: Location) -> Self {
        Self {
            current: initial,
            visits: Vec::new(),
        }
    }

    pub fn visits(&self) -> &[Location] {
        &self.visits
    }
}

impl Navigator for RecordingNavigator {
    fn location(&self) -> &Location {
        &self.current
    }

    fn navigate(&mut self, location: Location) {
        self.visits.push(location.clone());
        self.current = location;
    }
}

pub fn id(raw: &str) -> SessionId {
    SessionId::parse(raw).unwrap()
}

pub fn summary(raw: &str, preview: &str) -> ChatSummary {
    ChatSummary {
        session_id: id(raw),
        title: format!("Chat {raw}"),
        preview: preview.to_string(),
    }
}

pub fn reply(text: &str) -> Result<AnalyzeReply> {
    Ok(AnalyzeReply {
        response: text.to_string(),
        plot: None,
        session_id: None,
    })
}

pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
