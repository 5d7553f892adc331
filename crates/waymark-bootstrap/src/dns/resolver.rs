//! DNS lookups used by the seed bootstrapper.
//!
//! [`SeedResolver`] is the seam between the bootstrapper and DNS, so lookups
//! can be diverted (for example through a proxy) or scripted in tests.
//! [`HickoryResolver`] is the default implementation.

use crate::error::DnsSeedError;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::fmt;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};

/// Default per-query timeout
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A target returned by an SRV query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvTarget {
    /// Hostname of the node, without a trailing dot
    pub target: String,
    /// Port the node listens on
    pub port: u16,
}

impl SrvTarget {
    /// Create a new SRV target
    #[must_use]
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        Self {
            target: target.into(),
            port,
        }
    }
}

/// Blocking DNS lookups needed by the seed protocol
pub trait SeedResolver {
    /// Query SRV records for a fully formed service name
    ///
    /// # Errors
    ///
    /// Returns [`DnsSeedError::SrvLookup`] if the query fails.
    fn lookup_srv(&self, name: &str) -> Result<Vec<SrvTarget>, DnsSeedError>;

    /// Resolve a hostname to its IP addresses
    ///
    /// A name without address records resolves to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DnsSeedError::HostLookup`] if the query fails.
    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DnsSeedError>;
}

impl<R: SeedResolver + ?Sized> SeedResolver for &R {
    fn lookup_srv(&self, name: &str) -> Result<Vec<SrvTarget>, DnsSeedError> {
        (**self).lookup_srv(name)
    }

    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DnsSeedError> {
        (**self).lookup_host(host)
    }
}

impl<R: SeedResolver + ?Sized> SeedResolver for Arc<R> {
    fn lookup_srv(&self, name: &str) -> Result<Vec<SrvTarget>, DnsSeedError> {
        (**self).lookup_srv(name)
    }

    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DnsSeedError> {
        (**self).lookup_host(host)
    }
}

/// Resolver backed by hickory-dns
///
/// Owns a single-threaded tokio runtime and blocks the caller for the
/// duration of each lookup. When called from inside another tokio runtime
/// the lookup is driven on a scoped helper thread, since runtimes cannot be
/// nested. Like any tokio runtime owner it must be dropped outside async
/// context.
pub struct HickoryResolver {
    runtime: Runtime,
    resolver: TokioResolver,
}

impl HickoryResolver {
    /// Create a resolver from the system configuration (`/etc/resolv.conf`)
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start or the system
    /// configuration cannot be read.
    pub fn new(timeout: Duration) -> Result<Self, DnsSeedError> {
        let runtime = Self::runtime()?;
        let resolver = {
            let _guard = runtime.enter();
            let mut builder = TokioResolver::builder_tokio()
                .map_err(|e| DnsSeedError::Resolver(format!("system config: {e}")))?;
            builder.options_mut().timeout = timeout;
            builder.build()
        };
        Ok(Self { runtime, resolver })
    }

    /// Create a resolver with explicit upstream configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start.
    pub fn with_config(config: ResolverConfig, timeout: Duration) -> Result<Self, DnsSeedError> {
        let runtime = Self::runtime()?;
        let mut options = ResolverOpts::default();
        options.timeout = timeout;
        let resolver = {
            let _guard = runtime.enter();
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(options)
                .build()
        };
        Ok(Self { runtime, resolver })
    }

    fn runtime() -> Result<Runtime, DnsSeedError> {
        Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DnsSeedError::Resolver(format!("failed to create runtime: {e}")))
    }

    /// Drive `fut` to completion on the owned runtime
    fn block_on<F>(&self, fut: F) -> Result<F::Output, DnsSeedError>
    where
        F: Future + Send,
        F::Output: Send,
    {
        if Handle::try_current().is_err() {
            return Ok(self.runtime.block_on(fut));
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| self.runtime.block_on(fut))
                .join()
                .map_err(|_| DnsSeedError::Resolver("lookup thread panicked".to_string()))
        })
    }
}

impl SeedResolver for HickoryResolver {
    fn lookup_srv(&self, name: &str) -> Result<Vec<SrvTarget>, DnsSeedError> {
        let lookup = self
            .block_on(self.resolver.srv_lookup(name))?
            .map_err(|e| DnsSeedError::SrvLookup {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(lookup
            .iter()
            .map(|srv| {
                let target = srv.target().to_utf8();
                SrvTarget::new(target.trim_end_matches('.'), srv.port())
            })
            .collect())
    }

    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DnsSeedError> {
        match self.block_on(self.resolver.lookup_ip(host))? {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(e) if e.is_no_records_found() => Ok(Vec::new()),
            Err(e) => Err(DnsSeedError::HostLookup {
                host: host.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HickoryResolver").finish_non_exhaustive()
    }
}
