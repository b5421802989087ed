use crate::errors::ApcError;
use core::fmt::{
    Display,
    Formatter,
    Result,
};
use core::str::FromStr;

/// Tokens that address every outlet at once.
pub const ALL_OUTLET_ALIASES: [&str; 3] = ["*", "+", "all"];

/// An outlet on the PDU -- either one specific outlet index or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlet {
    /// A single outlet, addressed by its index. The device validates the range.
    Indexed(i64),
    /// Every outlet on the PDU.
    All,
}

impl Outlet {
    /// Resolve a user supplied token into an `Outlet`. The "all" aliases are matched case
    /// sensitively; anything else must parse as an integer.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::BadOutlet` carrying the token if it is neither an alias nor an integer.
    pub fn resolve(token: &str) -> core::result::Result<Self, ApcError> {
        if ALL_OUTLET_ALIASES.contains(&token) {
            return Ok(Self::All);
        }

        token
            .trim()
            .parse::<i64>()
            .map(Self::Indexed)
            .map_err(|_| ApcError::BadOutlet(token.to_owned()))
    }

    /// The human-readable label used when reporting, e.g. "Outlet #3" or "ALL outlets".
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Indexed(n) => format!("Outlet #{n}"),
            Self::All => String::from("ALL outlets"),
        }
    }

    /// The outlet argument as written into device commands.
    #[must_use]
    pub fn argument(&self) -> String {
        match self {
            Self::Indexed(n) => n.to_string(),
            Self::All => String::from("all"),
        }
    }
}

impl FromStr for Outlet {
    type Err = ApcError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl Display for Outlet {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> Result {
        write!(f, "{}", self.label())
    }
}
