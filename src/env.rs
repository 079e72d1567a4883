use fnv::FnvHashMap;

use crate::CalcNumber;

/// What reading a name that was never assigned does.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum UnboundPolicy {
    /// The read fails and nothing is bound.
    #[default]
    Error,

    /// The name is bound to zero and the read yields zero.
    Zero,
}

/// The variables of a session, seeded with the constants `pi` and `e`.
#[derive(Debug, Clone)]
pub struct Environment {
    symbols: FnvHashMap<String, CalcNumber>,
    policy: UnboundPolicy,
}

impl Environment {
    pub fn new() -> Self {
        Self::with_policy(UnboundPolicy::default())
    }

    pub fn with_policy(policy: UnboundPolicy) -> Self {
        let mut symbols = FnvHashMap::default();
        symbols.insert("pi".to_string(), std::f64::consts::PI);
        symbols.insert("e".to_string(), std::f64::consts::E);

        Self { symbols, policy }
    }

    pub fn policy(&self) -> UnboundPolicy {
        self.policy
    }

    /// Reads the value bound to `identifier`, applying the unbound policy when there is none.
    pub fn lookup(&mut self, identifier: &str) -> Option<CalcNumber> {
        if let Some(value) = self.symbols.get(identifier) {
            return Some(*value);
        }

        match self.policy {
            UnboundPolicy::Error => None,
            UnboundPolicy::Zero => {
                tracing::debug!(identifier, "binding unbound name to zero");
                self.symbols.insert(identifier.to_string(), 0.0);
                Some(0.0)
            }
        }
    }

    /// Binds `identifier` to `value`, overwriting any previous binding.
    pub fn assign(&mut self, identifier: String, value: CalcNumber) {
        tracing::debug!(%identifier, value, "assigned");
        self.symbols.insert(identifier, value);
    }

    /// The current binding, without any side effect.
    pub fn get(&self, identifier: &str) -> Option<CalcNumber> {
        self.symbols.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn constants_are_seeded() {
        let mut env = Environment::new();
        assert_eq!(env.lookup("pi"), Some(3.14159265358979323846));
        assert_eq!(env.lookup("e"), Some(2.71828182845904523536));
        assert_eq!(env.len(), 2);
        assert!(!env.is_empty());
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut env = Environment::new();
        assert_eq!(env.lookup("PI"), None);
    }

    #[test]
    fn unbound_reads_fail_without_binding() {
        let mut env = Environment::new();
        assert_eq!(env.lookup("x"), None);
        assert_eq!(env.lookup("x"), None);
        assert_eq!(env.get("x"), None);
    }

    #[test]
    fn unbound_reads_bind_zero_when_lenient() {
        let mut env = Environment::with_policy(UnboundPolicy::Zero);
        assert_eq!(env.lookup("x"), Some(0.0));
        assert_eq!(env.get("x"), Some(0.0));
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn assignment_overwrites() {
        let mut env = Environment::new();
        env.assign("pi".to_string(), 3.0);
        env.assign("x".to_string(), 1.5);
        assert_eq!(env.lookup("pi"), Some(3.0));
        assert_eq!(env.lookup("x"), Some(1.5));
    }
}
