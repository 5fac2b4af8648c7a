use std::any::Any;
use std::io::{BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::processor::{default_processor, PayloadProcessor, ProcessingError, ProcessingOutcome};
use crate::request::{InboundRequest, ResponseSink, FORWARDED_FOR_HEADER};


const MODULE: &str = "DISPATCHER";

pub const HTTP_POST_METHOD: &str = "POST";
pub const ADDRESS_NOT_KNOWN: &str = "address not known";


/// Entry point for bot platform webhook calls.
///
/// Accepts POST only, hands the body to the processor and writes exactly one
/// response. Nothing raised by the processor escapes `dispatch`.
pub struct WebhookDispatcher {
    processor: Arc<dyn PayloadProcessor>,
}

impl WebhookDispatcher {
    pub fn new(processor: Arc<dyn PayloadProcessor>) -> WebhookDispatcher {
        WebhookDispatcher { processor }
    }

    pub fn dispatch<R, S>(&self, request: &mut R, response: &mut S)
    where
        R: InboundRequest + ?Sized,
        S: ResponseSink + ?Sized,
    {
        if request.method() != HTTP_POST_METHOD {
            info!("[{}] Method {} isn't implemented: {}", MODULE, request.method(), client_address(request));
            response.bad_method(HTTP_POST_METHOD);
            return;
        }

        match self.process_request_body(request.body()) {
            Ok(Some(body)) => response.ok_with_body(body),
            Ok(None) => response.ok(),
            Err(e) => {
                warn!("[{}] Could not parse request body: {}", MODULE, e);
                response.internal_error();
            }
        }
    }

    fn process_request_body(&self, body: &mut dyn Read) -> ProcessingOutcome {
        let mut reader = BufReader::new(body);
        panic::catch_unwind(AssertUnwindSafe(|| self.processor.process(&mut reader)))
            .unwrap_or_else(|payload| Err(ProcessingError::Fault(panic_message(payload.as_ref()))))
    }
}

impl Default for WebhookDispatcher {
    fn default() -> Self {
        WebhookDispatcher::new(default_processor())
    }
}

/// Caller address for logs only, never sent back in a response
pub fn client_address<R: InboundRequest + ?Sized>(request: &R) -> &str {
    request.first_header(FORWARDED_FOR_HEADER).unwrap_or(ADDRESS_NOT_KNOWN)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "processor panicked".to_string()
    }
}
