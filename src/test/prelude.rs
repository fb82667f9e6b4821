//! Prelude module with common types used for unit tests.

pub use crate::test::transport::TestTransport;
use futures::future::FutureExt;
pub use serde_json::json;
use std::future::Future;

/// An extension trait for driving futures in unit tests.
pub trait FutureTestExt: Future {
    /// Block the thread on a future completing.
    fn wait(self) -> Self::Output;
    /// Assert that the future is ready immediately and return the output.
    fn immediate(self) -> Self::Output;
}

impl<F: Future + Sized> FutureTestExt for F {
    fn wait(self) -> Self::Output {
        futures::executor::block_on(self)
    }
    fn immediate(self) -> Self::Output {
        self.now_or_never()
            .expect("future did not resolve immediately")
    }
}
