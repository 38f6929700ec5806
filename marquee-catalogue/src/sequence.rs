//! Request sequencing for last-write-wins views.

use std::fmt;

/// Token stamped on each request a view issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a response handed back to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The response belonged to the latest request and updated the view.
    Applied,
    /// A newer request was issued in the meantime; the response was dropped.
    Stale,
}

/// Monotonic token source. Only the most recently issued token is current.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    issued: u64,
    outstanding: bool,
}

impl RequestSequence {
    /// Issues a new token, superseding every earlier one.
    pub(crate) fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        self.outstanding = true;
        RequestToken(self.issued)
    }

    /// Marks `token` resolved if it is current. Returns false for stale tokens.
    pub(crate) fn resolve(&mut self, token: RequestToken) -> bool {
        if token.0 != self.issued || !self.outstanding {
            return false;
        }
        self.outstanding = false;
        true
    }

    /// Whether the latest request is still unresolved.
    pub(crate) fn is_outstanding(&self) -> bool {
        self.outstanding
    }
}
