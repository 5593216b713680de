//! Page routing rules of the single-page front-end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Landing,
    #[serde(rename = "signin")]
    SignIn,
    #[serde(rename = "signup")]
    SignUp,
    Dashboard,
    Income,
    Expenses,
    Tax,
    Savings,
    Insights,
    Profile,
}

impl Page {
    /// Pages listed in the header navigation, in display order.
    pub const APP_PAGES: [Page; 7] = [
        Page::Dashboard,
        Page::Income,
        Page::Expenses,
        Page::Tax,
        Page::Savings,
        Page::Insights,
        Page::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::SignIn => "signin",
            Page::SignUp => "signup",
            Page::Dashboard => "dashboard",
            Page::Income => "income",
            Page::Expenses => "expenses",
            Page::Tax => "tax",
            Page::Savings => "savings",
            Page::Insights => "insights",
            Page::Profile => "profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Landing => "Welcome",
            Page::SignIn => "Sign In",
            Page::SignUp => "Sign Up",
            Page::Dashboard => "Dashboard",
            Page::Income => "Income",
            Page::Expenses => "Expenses",
            Page::Tax => "Taxes",
            Page::Savings => "Savings",
            Page::Insights => "Insights",
            Page::Profile => "Profile",
        }
    }

    /// Landing and auth pages, reachable without signing in.
    pub fn is_public(&self) -> bool {
        matches!(self, Page::Landing | Page::SignIn | Page::SignUp)
    }

    pub fn shows_header(&self) -> bool {
        !self.is_public()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landing" | "" => Ok(Page::Landing),
            "signin" => Ok(Page::SignIn),
            "signup" => Ok(Page::SignUp),
            "dashboard" => Ok(Page::Dashboard),
            "income" => Ok(Page::Income),
            "expenses" => Ok(Page::Expenses),
            "tax" => Ok(Page::Tax),
            "savings" => Ok(Page::Savings),
            "insights" => Ok(Page::Insights),
            "profile" => Ok(Page::Profile),
            other => Err(format!("Unknown page: {}", other)),
        }
    }
}

/// The page actually shown for `requested`.
///
/// Signed-in users skip the landing and auth pages; signed-out users are
/// sent back to the landing page from app pages.
pub fn resolve_page(requested: Page, signed_in: bool) -> Page {
    match (signed_in, requested.is_public()) {
        (true, true) => Page::Dashboard,
        (false, false) => Page::Landing,
        _ => requested,
    }
}

/// Target of the landing page's "Get Started" button.
pub fn get_started_target(signed_in: bool) -> Page {
    if signed_in {
        Page::Dashboard
    } else {
        Page::SignIn
    }
}
