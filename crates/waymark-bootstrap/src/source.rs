//! The capability every peer discovery source provides.

use crate::address::NetAddress;
use crate::error::BootstrapError;
use crate::node_id::ExclusionSet;

/// An initial peer bootstrap mechanism
///
/// Supplies a joining node with the identity key and address of existing
/// peers before any connection exists. Implementations include the channel
/// graph sampler and BOLT-0010 DNS seeds.
pub trait BootstrapSource {
    /// Sample up to `count` peer addresses
    ///
    /// No returned address belongs to a node in `exclude`, which lets the
    /// caller skip peers it is already connected to. Returning fewer than
    /// `count` addresses, including none, is not an error.
    ///
    /// # Errors
    ///
    /// Returns the source-specific fatal error; see [`BootstrapError`].
    fn sample(
        &mut self,
        count: u32,
        exclude: &ExclusionSet,
    ) -> Result<Vec<NetAddress>, BootstrapError>;

    /// Human readable name of this source, for diagnostics
    fn name(&self) -> String;
}

impl<S: BootstrapSource + ?Sized> BootstrapSource for Box<S> {
    fn sample(
        &mut self,
        count: u32,
        exclude: &ExclusionSet,
    ) -> Result<Vec<NetAddress>, BootstrapError> {
        (**self).sample(count, exclude)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
