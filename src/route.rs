//! Route identifiers and direction pairing.
//!
//! Route ids have the form `"<root> <direction>"`, e.g. `"SR9 EB"`. NB and EB
//! are primary directions; SB and WB are their secondary counterparts.

use crate::{ConflateError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteDirection {
    Nb,
    Sb,
    Eb,
    Wb,
}

impl RouteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDirection::Nb => "NB",
            RouteDirection::Sb => "SB",
            RouteDirection::Eb => "EB",
            RouteDirection::Wb => "WB",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, RouteDirection::Nb | RouteDirection::Eb)
    }

    /// The other carriageway's direction.
    pub fn opposite(&self) -> RouteDirection {
        match self {
            RouteDirection::Nb => RouteDirection::Sb,
            RouteDirection::Sb => RouteDirection::Nb,
            RouteDirection::Eb => RouteDirection::Wb,
            RouteDirection::Wb => RouteDirection::Eb,
        }
    }
}

impl std::fmt::Display for RouteDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteDirection {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NB" => Ok(RouteDirection::Nb),
            "SB" => Ok(RouteDirection::Sb),
            "EB" => Ok(RouteDirection::Eb),
            "WB" => Ok(RouteDirection::Wb),
            _ => Err(()),
        }
    }
}

/// A parsed route id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    /// Route system and number, e.g. "SR9" or "US20"
    pub root: String,
    pub direction: RouteDirection,
}

impl RouteKey {
    /// Parse `"<root> <direction>"`. Surrounding whitespace is ignored.
    ///
    /// # Example
    /// ```
    /// use routeconflate::{RouteDirection, RouteKey};
    /// let key = RouteKey::parse("SR9 EB").unwrap();
    /// assert_eq!(key.root, "SR9");
    /// assert_eq!(key.direction, RouteDirection::Eb);
    /// assert_eq!(key.paired().to_string(), "SR9 WB");
    /// ```
    pub fn parse(route_id: &str) -> Result<Self> {
        let invalid = || ConflateError::InvalidRouteId(route_id.to_string());
        let (root, direction) = route_id.trim().rsplit_once(' ').ok_or_else(invalid)?;
        let root = root.trim();
        if root.is_empty() {
            return Err(invalid());
        }
        let direction = direction.parse().map_err(|_| invalid())?;
        Ok(Self {
            root: root.to_string(),
            direction,
        })
    }

    pub fn is_primary(&self) -> bool {
        self.direction.is_primary()
    }

    /// The same route in the opposite direction.
    pub fn paired(&self) -> RouteKey {
        RouteKey {
            root: self.root.clone(),
            direction: self.direction.opposite(),
        }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.root, self.direction)
    }
}
