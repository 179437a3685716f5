use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderValue, RETRY_AFTER},
};
use common::error::AppError;
use governor::{
    Quota, RateLimiter,
    clock::{Clock, QuantaClock},
    state::{InMemoryState, NotKeyed},
};
use std::{future::Future, num::NonZeroU32, pin::Pin, rc::Rc, sync::Arc};

/// This limiter works for each request coming in (not per client).
///
/// Clones share one bucket, so a single limiter can wrap several scopes and
/// every worker.
#[derive(Clone)]
pub struct GlobalLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, QuantaClock>>,
}

impl GlobalLimiter {
    pub fn new(permits_per_sec: NonZeroU32) -> Self {
        let quota = Quota::per_second(permits_per_sec);
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GlobalLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = GlobalLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(GlobalLimiterService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct GlobalLimiterService<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, QuantaClock>>,
}

impl<S, B> Service<ServiceRequest> for GlobalLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        Box::pin(async move {
            match limiter.check() {
                // Move to the next services if ok
                Ok(()) => srv.call(req).await.map(|res| res.map_into_boxed_body()),
                // Return 429 if limit reached
                Err(not_until) => {
                    let wait = not_until.wait_time_from(QuantaClock::default().now());
                    log::warn!("Rate limit reached on {}", req.path());
                    let mut res = req.error_response(AppError::TooManyRequests(
                        "Server overloaded. Please try again later.".to_string(),
                    ));
                    // whole seconds, rounded up
                    let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                    res.headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from(retry_after.max(1)));
                    Ok(res)
                }
            }
        })
    }
}
