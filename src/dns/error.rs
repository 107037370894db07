use thiserror::Error;

use super::RecordType;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// DNS failures other than "not found".
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("{record_type} lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        record_type: RecordType,
        #[source]
        source: BoxError,
    },
    #[error("TXT record {name} contains invalid UTF-8 data: {source}")]
    TxtDataUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl ResolutionError {
    pub fn lookup(
        name: impl Into<String>,
        record_type: RecordType,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Lookup {
            name: name.into(),
            record_type,
            source: source.into(),
        }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn txt_data_utf8(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::TxtDataUtf8 {
            name: name.into(),
            source,
        }
    }
}
