//! Live hop capture with the system `traceroute`.

use std::net::IpAddr;
use std::process::Stdio;
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use tokio::process::Command;

use super::types::CapturedHop;
use crate::error_handling::SourceError;

/// Probes per hop
const QUERIES_PER_HOP: &str = "3";

const HOP_LINE_PATTERN: &str = r"^\s*(?P<ttl>\d+)\s+(?P<rest>.*)$";
const PAREN_IP_PATTERN: &str = r"\((?P<ip>[0-9A-Fa-f:.]+)\)";
const RTT_PATTERN: &str = r"(?P<rtt>\d+(?:\.\d+)?)\s*ms";

fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static HOP_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(HOP_LINE_PATTERN, "HOP_LINE_RE"));
static PAREN_IP_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(PAREN_IP_PATTERN, "PAREN_IP_RE"));
static RTT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(RTT_PATTERN, "RTT_RE"));

/// Runs `traceroute -n -q 3 -m <max_hops> <target>` and parses its output.
pub async fn capture_traceroute(
    traceroute_bin: &str,
    target: &str,
    max_hops: u8,
) -> Result<Vec<CapturedHop>, SourceError> {
    info!("Running {} to {} (max {} hops)", traceroute_bin, target, max_hops);
    let output = Command::new(traceroute_bin)
        .arg("-n")
        .arg("-q")
        .arg(QUERIES_PER_HOP)
        .arg("-m")
        .arg(max_hops.to_string())
        .arg(target)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SourceError::TracerouteFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let hops = parse_traceroute_output(&String::from_utf8_lossy(&output.stdout));
    debug!("traceroute reported {} responding hops", hops.len());
    Ok(hops)
}

/// Extracts one hop per responding TTL from traceroute output.
///
/// Handles both `-n` output (`1  192.0.2.1  3.674 ms ...`) and resolved output
/// (`1  router.example (192.0.2.1)  3.674 ms ...`). The hop's `min_rtt` is the
/// smallest sample. TTLs where nothing answered are omitted.
pub fn parse_traceroute_output(output: &str) -> Vec<CapturedHop> {
    output.lines().filter_map(parse_traceroute_line).collect()
}

fn parse_traceroute_line(line: &str) -> Option<CapturedHop> {
    let caps = HOP_LINE_RE.captures(line)?;
    let rest = caps.name("rest")?.as_str();

    let ip_address = match PAREN_IP_RE.captures(rest) {
        Some(paren) => paren["ip"].parse::<IpAddr>().ok()?,
        None => rest
            .split_whitespace()
            .find_map(|token| token.parse::<IpAddr>().ok())?,
    };

    let min_rtt = RTT_RE
        .captures_iter(rest)
        .filter_map(|c| c["rtt"].parse::<f64>().ok())
        .reduce(f64::min);

    Some(CapturedHop {
        ip_address: ip_address.to_string(),
        asn: None,
        min_rtt,
        place: None,
    })
}
