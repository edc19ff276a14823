//! Policy Decisions

/// Outcome of one policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    allowed: bool,
    cause: Option<String>,
}

impl Decision {
    /// Permit the operation
    pub fn allow() -> Self {
        Self {
            allowed: true,
            cause: None,
        }
    }

    /// Refuse the operation with a human-readable cause
    pub fn deny(cause: impl Into<String>) -> Self {
        Self {
            allowed: false,
            cause: Some(cause.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Denial cause; empty for allowed decisions
    pub fn cause(&self) -> &str {
        self.cause.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision() {
        assert!(Decision::allow().is_allowed());
        let denied = Decision::deny("no ownership");
        assert!(!denied.is_allowed());
        assert_eq!(denied.cause(), "no ownership");
    }
}
