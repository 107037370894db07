/// Maximum `include`/`redirect` nesting, after the RFC 7208 lookup limit of 10.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// What a DNS transport failure does to a resolution in progress.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverErrorPolicy {
    /// Record an issue on the declaring record and keep going.
    #[default]
    Tolerate,
    /// Fail the whole resolution.
    Abort,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfOptions {
    max_depth: usize,
    resolver_errors: ResolverErrorPolicy,
    fetch_explanation: bool,
}

impl SpfOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_resolver_errors(mut self, policy: ResolverErrorPolicy) -> Self {
        self.resolver_errors = policy;
        self
    }

    /// Fetch the TXT record named by `exp=` and keep it on the record.
    pub fn fetch_explanation(mut self, value: bool) -> Self {
        self.fetch_explanation = value;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn resolver_errors(&self) -> ResolverErrorPolicy {
        self.resolver_errors
    }

    pub fn fetches_explanation(&self) -> bool {
        self.fetch_explanation
    }
}

impl Default for SpfOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            resolver_errors: ResolverErrorPolicy::default(),
            fetch_explanation: false,
        }
    }
}
