//! A type-erased `web3` transport. A `Connection` stores its transport as a
//! `DynTransport` so that accounts, contracts and functions can share it
//! without carrying the concrete transport type around.

use futures::future::BoxFuture;
use futures::FutureExt as _;
use jsonrpc_core::Call;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use web3::error::Error as Web3Error;
use web3::{RequestId, Transport};

type ResponseFuture = BoxFuture<'static, Result<Value, Web3Error>>;

/// The object safe part of `Transport`.
trait ErasedTransport: Debug + Send + Sync {
    fn build(&self, method: &str, params: Vec<Value>) -> (RequestId, Call);
    fn dispatch(&self, id: RequestId, request: Call) -> ResponseFuture;
}

impl<T> ErasedTransport for T
where
    T: Transport + Send + Sync,
    T::Out: Send + 'static,
{
    fn build(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
        Transport::prepare(self, method, params)
    }

    fn dispatch(&self, id: RequestId, request: Call) -> ResponseFuture {
        Transport::send(self, id, request).boxed()
    }
}

/// A cheaply cloneable transport that forwards every request to the
/// transport it was created from.
#[derive(Clone, Debug)]
pub struct DynTransport {
    inner: Arc<dyn ErasedTransport>,
}

impl DynTransport {
    /// Erase the type of `transport`. A transport that already is a
    /// `DynTransport` is shared instead of being wrapped a second time.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + Send + Sync + 'static,
        T::Out: Send + 'static,
    {
        match (&transport as &dyn Any).downcast_ref::<DynTransport>() {
            Some(transport) => transport.clone(),
            None => DynTransport {
                inner: Arc::new(transport),
            },
        }
    }
}

impl Transport for DynTransport {
    type Out = ResponseFuture;

    fn prepare(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
        self.inner.build(method, params)
    }

    fn send(&self, id: RequestId, request: Call) -> Self::Out {
        self.inner.dispatch(id, request)
    }
}
