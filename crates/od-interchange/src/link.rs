//! Input links meeting at one merge/branch event.

use std::fmt;

use od_core::{CoreError, Polyline, Vertex};
use od_lanes::{LaneSpec, RoleLanes};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkRole {
    Ramp,
    Upstream,
    Downstream,
}

impl LinkRole {
    pub const ALL: [LinkRole; 3] = [LinkRole::Ramp, LinkRole::Upstream, LinkRole::Downstream];

    pub fn name(self) -> &'static str {
        match self {
            LinkRole::Ramp => "ramp",
            LinkRole::Upstream => "upstream",
            LinkRole::Downstream => "downstream",
        }
    }
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for LinkRole {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ramp" => Ok(LinkRole::Ramp),
            "upstream" | "up" => Ok(LinkRole::Upstream),
            "downstream" | "down" => Ok(LinkRole::Downstream),
            other => Err(CoreError::Parse(format!(
                "invalid link role {other:?}: expected \"ramp\", \"upstream\" or \"downstream\""
            ))),
        }
    }
}

/// One directed link: centreline in travel order plus lane attributes.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkGroup {
    pub role:        LinkRole,
    pub centerline:  Polyline,
    pub lanes:       LaneSpec,
    /// Metres per second.
    pub speed_limit: f64,
}

/// Painted gore edge; its first vertex opens the wedge, its last closes it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Border {
    polyline: Polyline,
}

impl Border {
    pub fn new(polyline: Polyline) -> Self {
        Self { polyline }
    }

    pub fn start(&self) -> &Vertex {
        self.polyline.first()
    }

    pub fn end(&self) -> &Vertex {
        self.polyline.last()
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }
}

/// The three links of one event.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkSet {
    pub ramp:       LinkGroup,
    pub upstream:   LinkGroup,
    pub downstream: LinkGroup,
}

impl LinkSet {
    pub fn get(&self, role: LinkRole) -> &LinkGroup {
        match role {
            LinkRole::Ramp => &self.ramp,
            LinkRole::Upstream => &self.upstream,
            LinkRole::Downstream => &self.downstream,
        }
    }

    pub fn role_lanes(&self) -> RoleLanes {
        RoleLanes {
            upstream:   self.upstream.lanes,
            downstream: self.downstream.lanes,
            ramp:       self.ramp.lanes,
        }
    }
}
