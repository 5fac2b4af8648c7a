#[macro_use] extern crate log;

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod logger;
pub mod processor;
pub mod request;
pub mod utils;

pub use dispatcher::WebhookDispatcher;
pub use processor::{PayloadProcessor, ProcessingError, ProcessingOutcome};
pub use request::{InboundRequest, OutboundResponse, ResponseSink};
