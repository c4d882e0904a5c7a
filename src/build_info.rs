//! Build metadata
//!
//! `build.rs` bumps a build counter and stamps the compile time; both arrive
//! here through `LIFEHUB_BUILD_NUMBER` and `LIFEHUB_BUILD_TIMESTAMP`.

use serde::Serialize;

/// Build counter, 0 when the build script did not run
pub const BUILD_NUMBER: u64 = match option_env!("LIFEHUB_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Compile time, ISO 8601
pub const BUILD_TIMESTAMP: &str = match option_env!("LIFEHUB_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const NAME: &str = env!("CARGO_PKG_NAME");

// str::parse is not const
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (digit - b'0') as u64;
        i += 1;
    }
    Some(value)
}

/// Snapshot of the running binary's build
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// "lifehub 1.0.0 (build 12)"
    pub fn label(&self) -> String {
        format!("{} {} (build {})", self.name, self.version, self.build_number)
    }
}

/// Startup banner on stderr; stdout belongs to the MCP transport
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    let rule = "-".repeat(47);
    eprintln!("{}", rule);
    eprintln!("  LifeHub | {}", info.label());
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("{}", rule);
}
