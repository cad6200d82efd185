//! # rag-console
//!
//! A thin client for a document-question RAG service. The service does the
//! real work (ingestion, chunking, embedding, retrieval, generation); this
//! crate turns three user actions (upload a document, delete everything,
//! ask a question) plus a status panel into HTTP round trips against its
//! `/stats`, `/upload`, `/delete` and `/query` endpoints.
//!
//! The core is [`adapter::ClientAdapter`], built from a
//! [`transport::Backend`] and the display targets in [`view`]. The terminal
//! binary injects [`terminal`] targets; the `wasm` feature injects DOM
//! nodes.
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use rag_console::adapter::ClientAdapter;
//! use rag_console::terminal::{AnswerPanel, StatsPanel, TerminalDialogs};
//! use rag_console::transport::HttpBackend;
//!
//! # async fn demo() -> Result<(), rag_console::error::ClientError> {
//! let answer = Rc::new(AnswerPanel::new());
//! let adapter = ClientAdapter::new(
//!     HttpBackend::builder("http://127.0.0.1:8000").build()?,
//!     StatsPanel::new(),
//!     Rc::clone(&answer),
//!     Rc::clone(&answer),
//!     TerminalDialogs::stdin(false),
//! );
//! adapter.start().await;
//! adapter.submit_query("What is X?").await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod api;
pub mod config;
pub mod error;
pub mod transport;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod repl;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod dom;

pub use adapter::{ClientAdapter, Form, QueryOutcome, StatsDisplay, StatsSnapshot, Submission};
pub use api::{Answer, HealthResponse, MessageResponse, QueryRequest, QueryResponse, StatsResponse};
pub use error::ClientError;
pub use transport::{Backend, BackendConfig, HttpBackend, UploadFile};
