use serde::Serialize;

/// Health of a pool, vdev or device as printed in the STATE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    Online,
    Degraded,
    Faulted,
    Offline,
    Removed,
    #[serde(rename = "INUSE")]
    InUse,
    Avail,
    /// Anything the table does not know, including the literal `UNAVAIL`.
    Unavail,
}

impl DeviceState {
    /// Case-insensitive lookup; unknown tokens read as `Unavail` rather than failing.
    pub fn classify(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "online"   => DeviceState::Online,
            "degraded" => DeviceState::Degraded,
            "faulted"  => DeviceState::Faulted,
            "offline"  => DeviceState::Offline,
            "removed"  => DeviceState::Removed,
            "inuse"    => DeviceState::InUse,
            "avail"    => DeviceState::Avail,
            _          => DeviceState::Unavail,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceState::Online   => "ONLINE",
            DeviceState::Degraded => "DEGRADED",
            DeviceState::Faulted  => "FAULTED",
            DeviceState::Offline  => "OFFLINE",
            DeviceState::Removed  => "REMOVED",
            DeviceState::InUse    => "INUSE",
            DeviceState::Avail    => "AVAIL",
            DeviceState::Unavail  => "UNAVAIL",
        }
    }

    /// Online, or a spare that is doing its job.
    pub fn is_healthy(&self) -> bool {
        matches!(self, DeviceState::Online | DeviceState::InUse | DeviceState::Avail)
    }
}

/// Role of a config entry, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Block,
    Mirror,
    Spare,
    Raidz1,
    Raidz2,
    Raidz3,
    Raidz4,
}

// Checked in order; first prefix wins.
const KIND_PREFIXES: [(&str, DeviceKind); 6] = [
    ("mirror", DeviceKind::Mirror),
    ("spare",  DeviceKind::Spare),
    ("raidz1", DeviceKind::Raidz1),
    ("raidz2", DeviceKind::Raidz2),
    ("raidz3", DeviceKind::Raidz3),
    ("raidz4", DeviceKind::Raidz4),
];

impl DeviceKind {
    /// Case-insensitive prefix match on the device name, e.g. `mirror-0`, `raidz2-1`.
    pub fn classify(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        KIND_PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(DeviceKind::Block)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Block  => "block",
            DeviceKind::Mirror => "mirror",
            DeviceKind::Spare  => "spare",
            DeviceKind::Raidz1 => "raidz1",
            DeviceKind::Raidz2 => "raidz2",
            DeviceKind::Raidz3 => "raidz3",
            DeviceKind::Raidz4 => "raidz4",
        }
    }

    /// True for entries that group other devices rather than store data directly.
    pub fn is_group(&self) -> bool {
        !matches!(self, DeviceKind::Block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_case_insensitive() {
        for token in ["ONLINE", "online", "OnLine", "  online "] {
            assert_eq!(DeviceState::classify(token), DeviceState::Online);
        }
        assert_eq!(DeviceState::classify("INUSE"), DeviceState::InUse);
        assert_eq!(DeviceState::classify("Avail"), DeviceState::Avail);
    }

    #[test]
    fn json_matches_printed_label() {
        for state in [
            DeviceState::Online,
            DeviceState::Degraded,
            DeviceState::Faulted,
            DeviceState::Offline,
            DeviceState::Removed,
            DeviceState::InUse,
            DeviceState::Avail,
            DeviceState::Unavail,
        ] {
            assert_eq!(serde_json::to_value(state).unwrap(), state.label());
        }
    }

    #[test]
    fn unknown_state_defaults_to_unavail() {
        assert_eq!(DeviceState::classify("SUSPENDED"), DeviceState::Unavail);
        assert_eq!(DeviceState::classify(""), DeviceState::Unavail);
        assert_eq!(DeviceState::classify("UNAVAIL"), DeviceState::Unavail);
    }

    #[test]
    fn kind_uses_prefix_in_priority_order() {
        assert_eq!(DeviceKind::classify("mirror-0"), DeviceKind::Mirror);
        assert_eq!(DeviceKind::classify("MIRROR-3"), DeviceKind::Mirror);
        assert_eq!(DeviceKind::classify("mirror-spare-raidz1"), DeviceKind::Mirror);
        assert_eq!(DeviceKind::classify("spare-1"), DeviceKind::Spare);
        assert_eq!(DeviceKind::classify("raidz1-0"), DeviceKind::Raidz1);
        assert_eq!(DeviceKind::classify("RaidZ2-4"), DeviceKind::Raidz2);
        assert_eq!(DeviceKind::classify("raidz3-0"), DeviceKind::Raidz3);
        assert_eq!(DeviceKind::classify("raidz4"), DeviceKind::Raidz4);
    }

    #[test]
    fn kind_defaults_to_block() {
        assert_eq!(DeviceKind::classify("c1t2d0"), DeviceKind::Block);
        assert_eq!(DeviceKind::classify("sda"), DeviceKind::Block);
        // Prefix, not substring.
        assert_eq!(DeviceKind::classify("disk-mirror"), DeviceKind::Block);
        // Bare `raidz` carries no level and is not in the table.
        assert_eq!(DeviceKind::classify("raidz-0"), DeviceKind::Block);
    }
}
