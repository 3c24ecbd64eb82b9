//! Hop records and the sources that supply them.
//!
//! A run reads hops either from a stored file (with ASN and a place descriptor
//! per hop) or from a live `traceroute` (IP and RTT samples only).

mod file;
mod traceroute;
mod types;

pub use file::{load_hop_file, parse_asn, parse_hop, parse_hop_lines, parse_rtt, ParsedHops};
pub use traceroute::{capture_traceroute, parse_traceroute_output};
pub use types::{
    CapturedHop, Geolocation, HopRecord, LocationSource, PlaceDescriptor, ResolvedPoint,
};

use std::path::PathBuf;

use crate::config::Config;
use crate::error_handling::SourceError;

/// Where the ordered hop sequence comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum HopSource {
    File(PathBuf),
    Live {
        target: String,
        traceroute_bin: String,
        max_hops: u8,
    },
}

impl HopSource {
    pub fn from_config(config: &Config) -> Self {
        if config.live {
            HopSource::Live {
                target: config.source.clone(),
                traceroute_bin: config.traceroute_bin.clone(),
                max_hops: config.max_hops,
            }
        } else {
            HopSource::File(PathBuf::from(&config.source))
        }
    }

    /// Live hops carry no ASN, so only stored records are held to having one.
    pub fn requires_asn(&self) -> bool {
        matches!(self, HopSource::File(_))
    }

    pub fn describe(&self) -> String {
        match self {
            HopSource::File(path) => path.display().to_string(),
            HopSource::Live { target, .. } => format!("traceroute:{}", target),
        }
    }

    /// Captures the hops in path order.
    pub async fn capture(&self) -> Result<ParsedHops, SourceError> {
        match self {
            HopSource::File(path) => load_hop_file(path).await,
            HopSource::Live {
                target,
                traceroute_bin,
                max_hops,
            } => Ok(ParsedHops {
                hops: capture_traceroute(traceroute_bin, target, *max_hops).await?,
                skipped: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_config() {
        let mut config = Config {
            source: "hops.txt".into(),
            ..Config::default()
        };
        let source = HopSource::from_config(&config);
        assert_eq!(source, HopSource::File(PathBuf::from("hops.txt")));
        assert!(source.requires_asn());
        assert_eq!(source.describe(), "hops.txt");

        config.live = true;
        config.source = "example.org".into();
        let source = HopSource::from_config(&config);
        assert!(!source.requires_asn());
        assert_eq!(source.describe(), "traceroute:example.org");
    }
}
