//! Builds checks from stored policy definitions.

use std::sync::Arc;

use tracing::debug;

use pwguard_core::types::Clock;
use pwguard_entity::policy::{PolicyDefinition, PolicyKey};

use crate::breach::BreachLookup;
use crate::checks::{
    ComplexityCheck, CompromisedPasswordCheck, CooldownCheck, ExpirationCheck, PolicyCheck,
    SizeCheck, SpecialCharactersCheck, UsernameExclusionCheck,
};
use crate::encoder::PasswordEncoder;
use crate::error::PolicyError;
use crate::rules::RuleSet;
use crate::store::PasswordHistoryStore;

/// Collaborators handed to the factory.
#[derive(Debug, Clone)]
pub struct CheckDependencies {
    /// Password history lookup for the expiration check.
    pub history: Option<Arc<dyn PasswordHistoryStore>>,
    /// Tenant-supplied password-encoder identifier.
    pub encoder_id: Option<String>,
    /// Breach-lookup client.
    pub breach: Arc<dyn BreachLookup>,
    /// Clock for time-based checks.
    pub clock: Arc<dyn Clock>,
}

/// Dependencies after validation, as the constructors see them.
#[derive(Debug)]
struct Resolved {
    history: Arc<dyn PasswordHistoryStore>,
    encoder: PasswordEncoder,
    breach: Arc<dyn BreachLookup>,
    clock: Arc<dyn Clock>,
}

type Constructor = fn(&RuleSet<'_>, &Resolved) -> PolicyCheck;

/// One entry per policy key.
const CONSTRUCTORS: [(PolicyKey, Constructor); 7] = [
    (PolicyKey::Size, build_size),
    (PolicyKey::Complexity, build_complexity),
    (PolicyKey::SpecialCharacters, build_special),
    (PolicyKey::CompromisedPassword, build_compromised),
    (PolicyKey::UsernameExclusion, build_username),
    (PolicyKey::Expiration, build_expiration),
    (PolicyKey::LastUpdate, build_cooldown),
];

fn build_size(rules: &RuleSet<'_>, _: &Resolved) -> PolicyCheck {
    PolicyCheck::Size(SizeCheck::from_rules(rules))
}

fn build_complexity(rules: &RuleSet<'_>, _: &Resolved) -> PolicyCheck {
    PolicyCheck::Complexity(ComplexityCheck::from_rules(rules))
}

fn build_special(rules: &RuleSet<'_>, _: &Resolved) -> PolicyCheck {
    PolicyCheck::SpecialCharacters(SpecialCharactersCheck::from_rules(rules))
}

fn build_compromised(rules: &RuleSet<'_>, deps: &Resolved) -> PolicyCheck {
    PolicyCheck::CompromisedPassword(CompromisedPasswordCheck::from_rules(
        rules,
        Arc::clone(&deps.breach),
    ))
}

fn build_username(rules: &RuleSet<'_>, _: &Resolved) -> PolicyCheck {
    PolicyCheck::UsernameExclusion(UsernameExclusionCheck::from_rules(rules))
}

fn build_expiration(rules: &RuleSet<'_>, deps: &Resolved) -> PolicyCheck {
    PolicyCheck::Expiration(ExpirationCheck::from_rules(
        rules,
        Arc::clone(&deps.history),
        deps.encoder,
        Arc::clone(&deps.clock),
    ))
}

fn build_cooldown(rules: &RuleSet<'_>, deps: &Resolved) -> PolicyCheck {
    PolicyCheck::Cooldown(CooldownCheck::from_rules(rules, Arc::clone(&deps.clock)))
}

/// Turns [`PolicyDefinition`] rows into [`PolicyCheck`]s.
#[derive(Debug)]
pub struct CheckFactory {
    deps: Resolved,
}

impl CheckFactory {
    /// Create a factory, rejecting missing or unsupported collaborators.
    pub fn new(deps: CheckDependencies) -> Result<Self, PolicyError> {
        let history = deps
            .history
            .ok_or(PolicyError::MissingDependency("password history store"))?;
        let encoder_id = deps
            .encoder_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(PolicyError::MissingDependency("password encoder identifier"))?;
        let encoder = encoder_id.parse::<PasswordEncoder>()?;

        Ok(Self {
            deps: Resolved {
                history,
                encoder,
                breach: deps.breach,
                clock: deps.clock,
            },
        })
    }

    /// The encoder history comparisons will use.
    pub fn encoder(&self) -> PasswordEncoder {
        self.deps.encoder
    }

    /// Build the check a definition describes.
    ///
    /// Malformed rule values never fail here; only an unknown key does.
    pub fn build(&self, definition: &PolicyDefinition) -> Result<PolicyCheck, PolicyError> {
        let key = definition
            .key
            .parse::<PolicyKey>()
            .map_err(|_| PolicyError::UnknownPolicyKey(definition.key.clone()))?;

        let constructor = CONSTRUCTORS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, constructor)| *constructor)
            .ok_or_else(|| PolicyError::UnknownPolicyKey(definition.key.clone()))?;

        debug!(key = %key, priority = definition.priority, "Building policy check");
        Ok(constructor(&RuleSet::new(definition.rules()), &self.deps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::BreachLookupError;
    use crate::store::MemoryHistoryStore;
    use async_trait::async_trait;
    use pwguard_core::types::SystemClock;
    use serde_json::json;

    #[derive(Debug)]
    struct NoBreach;

    #[async_trait]
    impl BreachLookup for NoBreach {
        async fn range(&self, _prefix: &str) -> Result<String, BreachLookupError> {
            Ok(String::new())
        }
    }

    fn deps() -> CheckDependencies {
        CheckDependencies {
            history: Some(Arc::new(MemoryHistoryStore::new())),
            encoder_id: Some("sha256".to_string()),
            breach: Arc::new(NoBreach),
            clock: Arc::new(SystemClock),
        }
    }

    #[test]
    fn test_every_key_has_a_constructor() {
        let factory = CheckFactory::new(deps()).unwrap();
        for key in PolicyKey::ALL {
            let def = PolicyDefinition::new(key.as_str(), 1, json!({}));
            let check = factory.build(&def).unwrap();
            assert_eq!(check.key(), key);
        }
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        let factory = CheckFactory::new(deps()).unwrap();
        let def = PolicyDefinition::new("Special_Characters", 1, json!({}));
        assert_eq!(factory.build(&def).unwrap().key(), PolicyKey::SpecialCharacters);
    }

    #[test]
    fn test_unknown_key() {
        let factory = CheckFactory::new(deps()).unwrap();
        let def = PolicyDefinition::new("entropy", 1, json!({}));
        assert!(matches!(
            factory.build(&def),
            Err(PolicyError::UnknownPolicyKey(key)) if key == "entropy"
        ));
    }

    #[test]
    fn test_malformed_rules_still_build() {
        let factory = CheckFactory::new(deps()).unwrap();
        for rules in [json!(null), json!("garbage"), json!({"minLength": {"nested": true}})] {
            let def = PolicyDefinition::new("size", 1, rules);
            assert!(factory.build(&def).is_ok());
        }
    }

    #[test]
    fn test_missing_dependencies() {
        let mut no_history = deps();
        no_history.history = None;
        assert!(matches!(
            CheckFactory::new(no_history),
            Err(PolicyError::MissingDependency("password history store"))
        ));

        let mut no_encoder = deps();
        no_encoder.encoder_id = Some("  ".to_string());
        assert!(matches!(
            CheckFactory::new(no_encoder),
            Err(PolicyError::MissingDependency("password encoder identifier"))
        ));
    }

    #[test]
    fn test_unsupported_encoder() {
        let mut bad = deps();
        bad.encoder_id = Some("md5".to_string());
        assert!(matches!(
            CheckFactory::new(bad),
            Err(PolicyError::UnsupportedEncoder(id)) if id == "md5"
        ));
    }
}
