use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which kind of identity token a verifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Id,
}

impl TokenUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for TokenUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenUse {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(Self::Access),
            "id" => Ok(Self::Id),
            _ => Err(()),
        }
    }
}

/// Claims carried by a user-pool token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub token_use: String,
    #[serde(default, alias = "cognito:username")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl Claims {
    /// The pool username, falling back to the subject.
    pub fn username_or_sub(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: Option<&str>) -> Claims {
        Claims {
            sub: "sub-1".to_string(),
            iss: "https://issuer".to_string(),
            token_use: "access".to_string(),
            username: username.map(str::to_string),
            email: None,
            exp: 0,
            iat: 0,
            client_id: None,
            scope: None,
        }
    }

    #[test]
    fn test_username_or_sub() {
        assert_eq!(claims(Some("alice")).username_or_sub(), "alice");
        assert_eq!(claims(Some("")).username_or_sub(), "sub-1");
        assert_eq!(claims(None).username_or_sub(), "sub-1");
    }

    #[test]
    fn test_id_token_username_alias() {
        let json = r#"{
            "sub": "s", "iss": "i", "token_use": "id",
            "cognito:username": "bob", "exp": 2, "iat": 1
        }"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_token_use_parse() {
        assert_eq!("access".parse::<TokenUse>(), Ok(TokenUse::Access));
        assert_eq!("id".parse::<TokenUse>(), Ok(TokenUse::Id));
        assert!("refresh".parse::<TokenUse>().is_err());
    }
}
