//! Decoding of the values returned by a [`Database`].

use std::str::FromStr as _;

use common::Money;
use tracing as log;

#[cfg(doc)]
use crate::infra::Database;

/// Decodes the [`Money`] amount of the provided `column` from its textual
/// `raw` representation.
///
/// Missing and malformed amounts are decoded as [`Money::ZERO`], the latter
/// being logged.
pub(crate) fn money(column: &'static str, raw: Option<&str>) -> Money {
    let Some(raw) = raw else {
        return Money::ZERO;
    };
    Money::from_str(raw).unwrap_or_else(|e| {
        log::warn!(
            column,
            raw,
            "malformed money amount is decoded as zero: {e}",
        );
        Money::ZERO
    })
}
