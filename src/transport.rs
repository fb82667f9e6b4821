//! Module containing additional transports used by the `chaincall`
//! runtime. In particular, this module includes `DynTransport` which wraps
//! other valid transports and uses dynamic dispatch to call the underlying
//! transport implementation, allowing client code to not be generic over
//! the transport (at the small cost of some dynamic dispatch and extra
//! allocations).

use futures::future::BoxFuture;
use futures::FutureExt as _;
use jsonrpc_core::Call;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use web3::error::Error as Web3Error;
use web3::{RequestId, Transport};

/// Type alias for the output future in the `DynTransport`'s `Transport`
/// implementation.
type BoxedFuture = BoxFuture<'static, Result<Value, Web3Error>>;

/// Helper trait that wraps the `Transport` trait so it can be used as a
/// trait object. This trait is implemented for all `Transport`'s.
trait TransportBoxed: Debug + Send + Sync + 'static {
    /// Wraps `Transport::prepare`
    fn prepare_boxed(&self, method: &str, params: Vec<Value>) -> (RequestId, Call);

    /// Wraps `Transport::send`
    fn send_boxed(&self, id: RequestId, request: Call) -> BoxedFuture;

    /// Wraps `Transport::execute`
    fn execute_boxed(&self, method: &str, params: Vec<Value>) -> BoxedFuture;

    /// Returns a reference to the inner transport.
    fn inner(&self) -> &(dyn Any + Send + Sync);
}

impl<F, T> TransportBoxed for T
where
    F: Future<Output = Result<Value, Web3Error>> + Send + 'static,
    T: Transport<Out = F> + Debug + Send + Sync + 'static,
{
    #[inline(always)]
    fn prepare_boxed(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
        self.prepare(method, params)
    }

    #[inline(always)]
    fn send_boxed(&self, id: RequestId, request: Call) -> BoxedFuture {
        self.send(id, request).boxed()
    }

    #[inline(always)]
    fn execute_boxed(&self, method: &str, params: Vec<Value>) -> BoxedFuture {
        self.execute(method, params).boxed()
    }

    #[inline(always)]
    fn inner(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

/// Dynamic `Transport` implementation to allow for a generic-free client
/// API. This type wraps any `Transport` type and implements `Transport`
/// itself.
#[derive(Debug)]
pub struct DynTransport {
    inner: Arc<dyn TransportBoxed>,
}

impl DynTransport {
    /// Wrap a `Transport` in a `DynTransport`.
    pub fn new<F, T>(inner: T) -> Self
    where
        F: Future<Output = Result<Value, Web3Error>> + Send + 'static,
        T: Transport<Out = F> + Send + Sync + 'static,
    {
        let inner_ref: &dyn Any = &inner;
        let inner_arc = match inner_ref.downcast_ref::<DynTransport>() {
            // NOTE: If a `DynTransport` is being created from another
            //   `DynTransport`, then just clone its inner transport instead
            //   of re-wrapping it.
            Some(dyn_transport) => dyn_transport.inner.clone(),
            None => Arc::new(inner),
        };

        DynTransport { inner: inner_arc }
    }

    /// Casts this transport into the underlying type.
    pub fn downcast<T: Any + Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.inner().downcast_ref()
    }
}

impl Clone for DynTransport {
    fn clone(&self) -> Self {
        DynTransport {
            inner: self.inner.clone(),
        }
    }
}

impl Transport for DynTransport {
    type Out = BoxedFuture;

    #[inline(always)]
    fn prepare(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
        self.inner.prepare_boxed(method, params)
    }

    #[inline(always)]
    fn send(&self, id: RequestId, request: Call) -> Self::Out {
        self.inner.send_boxed(id, request)
    }

    #[inline(always)]
    fn execute(&self, method: &str, params: Vec<Value>) -> Self::Out {
        self.inner.execute_boxed(method, params)
    }
}
