//! Principal roles and session-token claims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two principal roles a session token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
        }
    }
}

/// Unknown role string.
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Claims embedded in a session token. `sub` is the patient or doctor
/// identifier; `iat`/`exp` are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_serde_and_str() {
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"patient\"");
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn claims_serialize_with_plain_field_names() {
        let claims = Claims {
            sub: "P1".into(),
            role: Role::Patient,
            iat: 100,
            exp: 200,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "P1");
        assert_eq!(json["role"], "patient");
    }
}
