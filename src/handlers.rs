use std::io;

use tiny_http::{Header, Request, Response, StatusCode};

use crate::context::Context;
use crate::dispatcher::WebhookDispatcher;
use crate::request::{OutboundResponse, TinyHttpRequest, HTTP_500};


const MODULE: &str = "HANDLERS";


/// Run one dispatch for `r` and send back whatever it wrote
pub fn handle_webhook(mut r: Request, dispatcher: &WebhookDispatcher, ctx: &mut Context) -> io::Result<()> {
    let mut response = OutboundResponse::new();
    dispatcher.dispatch(&mut TinyHttpRequest::new(&mut r), &mut response);
    respond(r, ctx, response)
}

pub fn respond(r: Request, ctx: &mut Context, response: OutboundResponse) -> io::Result<()> {
    let (status, body, headers) = response.into_parts();
    let code = status.unwrap_or_else(|| {
        error!("[{}] No response written for [{}], sending {}", MODULE, ctx.qid, HTTP_500);
        HTTP_500
    });
    let sent = body.len();

    let mut tiny_response = Response::from_string(body).with_status_code(StatusCode(code));
    for (name, value) in headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => tiny_response.add_header(header),
            Err(_) => error!("[{}] Skipping invalid header {} for [{}]", MODULE, name, ctx.qid),
        }
    }

    let result = r.respond(tiny_response);

    ctx.fix();
    match &result {
        Ok(_) => info!("Respond to [{}]: time: {}ms; status: {}; sent: {} bytes", ctx.qid, ctx.time_ms(), code, sent),
        Err(e) => error!("[{}] Failed to respond to [{}]: {}", MODULE, ctx.qid, e),
    }

    result
}
