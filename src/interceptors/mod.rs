//! Interceptor chain around a [`Transport`].
//!
//! Each interceptor receives the outgoing request plus a [`Next`] handle for
//! the rest of the chain. `Next::run` consumes the handle, so an interceptor
//! reaches the network at most once per request.

mod cache;

pub use cache::CacheInterceptor;

use async_trait::async_trait;
use std::sync::Arc;

use crate::transport::Transport;
use crate::types::{HttpRequest, HttpResponse};
use crate::Result;

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse>;

    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Remainder of the chain: interceptors not yet run, then the transport.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>], transport: &'a dyn Transport) -> Self {
        Self {
            interceptors,
            transport,
        }
    }

    pub async fn run(self, request: HttpRequest) -> Result<HttpResponse> {
        match self.interceptors.split_first() {
            Some((current, rest)) => {
                current
                    .intercept(request, Next::new(rest, self.transport))
                    .await
            }
            None => Ok(self.transport.send(request).await?),
        }
    }
}

/// Interceptors run in insertion order, outermost first.
pub struct InterceptorPipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl InterceptorPipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            interceptors: Vec::new(),
            transport,
        }
    }

    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        Next::new(&self.interceptors, self.transport.as_ref())
            .run(request)
            .await
    }
}
