use derive_more::Display;
use serde::{Deserialize, Serialize};

const CURRENCY_NAMESPACE: &str = "ISO4217";

///
/// Commodity
///
/// Handle to a traded commodity. Equality is by value over
/// (namespace, mnemonic); two handles to "ISO4217::EUR" are the same
/// commodity.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[display("{namespace}::{mnemonic}")]
pub struct Commodity {
    namespace: String,
    mnemonic: String,
}

impl Commodity {
    pub fn new(namespace: impl Into<String>, mnemonic: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            mnemonic: mnemonic.into(),
        }
    }

    /// Shorthand for an ISO 4217 currency.
    pub fn currency(mnemonic: impl Into<String>) -> Self {
        Self::new(CURRENCY_NAMESPACE, mnemonic)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }
}
