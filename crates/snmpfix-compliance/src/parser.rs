//! Parser for `snmp-server host` statements.
//!
//! Grammar, positional after the two keywords:
//!
//! ```text
//! snmp-server host <host> [informs|traps] [version <1|2c|3 [auth|noauth|priv]>]
//!     [vrf <name>] <community> [options...]
//! ```

use serde::{Deserialize, Serialize};

const KEYWORD: &str = "snmp-server";
const SUBKEYWORD: &str = "host";

/// Notification type requested by a host statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Unacknowledged traps
    Traps,
    /// Acknowledged informs
    Informs,
}

/// One parsed `snmp-server host` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpHostLine {
    /// Line text with surrounding whitespace removed
    pub raw: String,

    /// Notification receiver
    pub host: String,

    /// `traps` or `informs`, when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationKind>,

    /// SNMP version, including the v3 security level (e.g. `3 priv`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// VRF the receiver is reached through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,

    /// Community string (or v3 user name); absent on truncated lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,

    /// Trailing options such as `udp-port 1162` or notification types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl SnmpHostLine {
    /// Parse a configuration line.
    ///
    /// Returns `None` unless the first two tokens are exactly `snmp-server`
    /// and `host` and a host token follows. Leading whitespace is ignored;
    /// keywords are case-sensitive.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim();
        let mut tokens = raw.split_whitespace().peekable();

        if tokens.next()? != KEYWORD || tokens.next()? != SUBKEYWORD {
            return None;
        }
        let host = tokens.next()?.to_string();

        let notification = match tokens.peek().copied() {
            Some("traps") => Some(NotificationKind::Traps),
            Some("informs") => Some(NotificationKind::Informs),
            _ => None,
        };
        if notification.is_some() {
            tokens.next();
        }

        let mut version = None;
        if tokens.next_if_eq(&"version").is_some() {
            version = tokens.next().map(|v| {
                let mut v = v.to_string();
                if v == "3" {
                    if let Some(level) = tokens.next_if(|t| matches!(*t, "auth" | "noauth" | "priv")) {
                        v.push(' ');
                        v.push_str(level);
                    }
                }
                v
            });
        }

        let mut vrf = None;
        if tokens.next_if_eq(&"vrf").is_some() {
            vrf = tokens.next().map(str::to_string);
        }

        let community = tokens.next().map(str::to_string);
        let options = tokens.map(str::to_string).collect();

        Some(Self {
            raw: raw.to_string(),
            host,
            notification,
            version,
            vrf,
            community,
            options,
        })
    }

    /// Returns true if host and community both equal the given pair exactly
    #[must_use]
    pub fn matches(&self, host: &str, community: &str) -> bool {
        self.host == host && self.community.as_deref() == Some(community)
    }

    /// Command that removes this line from a device
    #[must_use]
    pub fn negation(&self) -> String {
        format!("no {}", self.raw)
    }
}

impl std::fmt::Display for SnmpHostLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// All host statements of a configuration, in file order
pub fn host_lines(config: &str) -> impl Iterator<Item = SnmpHostLine> + '_ {
    config.lines().filter_map(SnmpHostLine::parse)
}
