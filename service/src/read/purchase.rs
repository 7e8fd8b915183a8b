//! [`Purchase`] read model definition.

use crate::domain::Purchase;

/// Wrapper around a [`Purchase`] indicating that it [`is_active()`].
///
/// [`is_active()`]: Purchase::is_active
#[derive(Clone, Debug)]
pub struct Active(pub Purchase);
