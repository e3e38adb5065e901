//! Memoization key derivation.

use std::any::type_name;

use serde::Serialize;

use crate::error::Result;
use crate::memo::tagged;

// == Key Strategy ==
/// Turns a computation name and its arguments into a cache key.
///
/// Equal names and equal arguments must give equal keys.
pub trait KeyStrategy<A: ?Sized> {
    fn derive(&self, name: &str, args: &A) -> Result<String>;
}

// == JSON Key ==
/// Default strategy: `"{name}:{type}:{tagged json}"`.
///
/// `type` is the argument type's name, and the arguments go through the
/// crate's tagged encoding: `Option` layers, enum
/// variants and newtypes keep markers, and map entries are sorted. So
/// `(1,)` and `("1",)` differ, `None` and `Some(None)` differ, and two equal
/// `HashMap`s give the same key whatever their iteration order.
/// Non-finite floats fail with [`CacheError::KeyDerivation`](crate::CacheError).
///
/// Pass positional arguments as a tuple and named ones as a struct or map.
/// The `name:` head lets `invalidate_prefix("name:")` drop every cached
/// result of one computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonKey;

impl<A: Serialize + ?Sized> KeyStrategy<A> for JsonKey {
    fn derive(&self, name: &str, args: &A) -> Result<String> {
        let encoded = tagged::encode(args)?;
        Ok(format!("{}:{}:{}", name, type_name::<A>(), encoded))
    }
}

/// Any `Fn(&str, &A) -> Result<String>` works as a strategy.
impl<A: ?Sized, F> KeyStrategy<A> for F
where
    F: Fn(&str, &A) -> Result<String>,
{
    fn derive(&self, name: &str, args: &A) -> Result<String> {
        self(name, args)
    }
}
