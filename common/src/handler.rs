//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// Used both for the domain queries and for the storage operations, so every
/// layer is driven through the same `execute()` call.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
