//! HTTP client SDK for the Dify conversational AI API.
//!
//! Every endpoint is a fixed route (method + path template). Operation
//! methods shape their parameters and hand a request to a single dispatcher,
//! which adds the bearer credential, picks buffered or streaming transport,
//! and returns the server's response unmodified.
//!
//! # Example
//!
//! ```no_run
//! use dify_client::{ChatMessageRequest, DifyClient, DifyResponse, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = DifyClient::builder()
//!     .base_url("http://localhost:5001/v1")
//!     .api_key("app-secret")
//!     .build()?;
//!
//! // Blocking answer
//! let answer = client
//!     .chat()
//!     .create_message(ChatMessageRequest::new("Hello!", "user-1"))
//!     .await?
//!     .into_buffered()?;
//! println!("{}", answer.body()["answer"]);
//!
//! // Streamed answer
//! use futures::StreamExt;
//! let response = client
//!     .chat()
//!     .create_message(ChatMessageRequest::new("Tell me a story", "user-1").streaming(true))
//!     .await?;
//! if let DifyResponse::Streaming(stream) = response {
//!     let events = stream.events();
//!     futures::pin_mut!(events);
//!     while let Some(event) = events.next().await {
//!         let chunk: serde_json::Value = event?.json()?;
//!         if let Some(text) = chunk["answer"].as_str() {
//!             print!("{}", text);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **App**: parameters, info, meta, message feedback
//! - **Files**: upload
//! - **Audio**: speech-to-text, text-to-speech
//! - **Chat**: send and stop messages, suggestions, conversations
//! - **Workflows**: run, status, stop, logs

pub mod api;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod routes;
pub mod types;

pub use client::{ClientBuilder, DifyClient, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use request::{ApiRequest, RequestBody};
pub use response::{BufferedResponse, DifyResponse, ResponseStream, StreamEvent};
pub use routes::Route;
pub use types::*;
