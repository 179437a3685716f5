use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use actix_web::{HttpResponse, ResponseError};
use colored::Colorize;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::{debug, info};
use serde_json::{Value, json};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request with status, timing and query params, and tags the
/// response with a request id. Error response bodies are logged at debug level.
pub struct LoggerMiddleware {
    console_logging_enabled: bool,
}

impl LoggerMiddleware {
    pub fn new(console_logging_enabled: bool) -> Self {
        Self {
            console_logging_enabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
            console_logging_enabled: self.console_logging_enabled,
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
    console_logging_enabled: bool,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Common request info
        let method = req.method().to_string();
        let path = req.path().to_string();
        let params_json = query_params(req.query_string());
        let request_id = Uuid::new_v4();

        let console_logging_enabled = self.console_logging_enabled;
        let srv = Rc::clone(&self.service);
        let started = Instant::now();

        Box::pin(async move {
            // Call next services
            let res = srv.call(req).await?;
            let status = res.status();
            let status_code = status.as_u16();
            let elapsed_ms = started.elapsed().as_millis();

            // Error bodies are buffered so they can be logged, then rebuilt
            let (res, response_body) = if status_code >= 400 {
                let (req, res) = res.into_parts();
                let headers = res.headers().clone();
                let response_body_bytes = body::to_bytes(res.into_body()).await?;
                let response_body = serde_json::from_slice::<Value>(&response_body_bytes)
                    .unwrap_or_else(|_| {
                        Value::String(String::from_utf8_lossy(&response_body_bytes).into_owned())
                    });
                let mut new_res = HttpResponse::build(status);
                for (key, value) in headers.iter() {
                    new_res.append_header((key.clone(), value.clone()));
                }
                let new_res = new_res.body(response_body_bytes);
                (ServiceResponse::new(req, new_res), Some(response_body))
            } else {
                (res.map_into_boxed_body(), None)
            };

            let mut res = res;
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            // Log to console
            if console_logging_enabled {
                let colored_status = match status_code {
                    200..=299 => status_code.to_string().green(),
                    300..=399 => status_code.to_string().yellow(),
                    400..=499 => status_code.to_string().bright_red(),
                    _ => status_code.to_string().red(),
                };

                let colored_method = match method.as_str() {
                    "GET" => method.blue(),
                    "POST" => method.yellow(),
                    "PUT" => method.purple(),
                    "DELETE" => method.red(),
                    _ => method.normal(),
                };

                info!(
                    "[{}] {} {} {} request_id={} params={}",
                    colored_status,
                    colored_method,
                    path.bright_white(),
                    format!("({}ms)", elapsed_ms).bright_black(),
                    request_id.to_string().bright_blue(),
                    params_json.to_string().bright_cyan(),
                );

                if let Some(body) = response_body {
                    debug!(
                        "  Response: {}",
                        serde_json::to_string(&body)
                            .unwrap_or_default()
                            .bright_yellow()
                    );
                }
            }

            Ok(res)
        })
    }
}

fn query_params(query_string: &str) -> Value {
    if query_string.is_empty() {
        return json!({});
    }
    let mut params_map = HashMap::new();
    for pair in query_string.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params_map.insert(key.to_string(), json!(value));
        } else {
            params_map.insert(pair.to_string(), json!(true));
        }
    }
    json!(params_map)
}
