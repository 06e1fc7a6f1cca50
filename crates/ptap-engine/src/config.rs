//! Declarative drop rules.
//!
//! A drop rule vetoes every packet matching its constraint, in one
//! direction. Rules are plain data — TOML/JSON-serializable — so a host
//! can ship packet filtering in its configuration without writing
//! handler code.
//!
//! # Example TOML
//!
//! ```toml
//! [[rules]]
//! id = "no-chat"
//! direction = "incoming"
//! constraint = "chat|whisper"
//!
//! [[rules]]
//! direction = "outgoing"
//! constraint = "outbound&compressible"
//! enabled = false
//! ```

use crate::{
    CapabilityConstraint, InterceptHandler, PacketHandler, PacketInterceptor, RegisterError,
    SignatureError,
};
use ptap_host::{Packet, Session};
use ptap_types::Direction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Top-level drop-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TapConfig {
    /// Declarative drop-rule definitions.
    pub rules: Vec<DropRuleDef>,
}

/// One declarative drop rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropRuleDef {
    /// Unique rule id. Auto-generated from the rule's position if not
    /// specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `"incoming"` or `"outgoing"`.
    pub direction: String,

    /// Constraint string (see
    /// [`CapabilityConstraint`](crate::CapabilityConstraint) string form).
    pub constraint: String,

    /// Whether the rule is applied. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Errors from validating a [`DropRuleDef`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleValidationError {
    /// `direction` is neither `"incoming"` nor `"outgoing"`.
    #[error("rule '{label}': unknown direction '{value}'")]
    UnknownDirection {
        /// Rule id or generated label.
        label: String,
        /// The offending value.
        value: String,
    },

    /// The constraint string does not parse.
    #[error("rule '{label}': {source}")]
    InvalidConstraint {
        /// Rule id or generated label.
        label: String,
        /// The parse failure.
        source: SignatureError,
    },
}

impl DropRuleDef {
    /// Validates this definition and returns its parsed parts.
    ///
    /// Checks direction and constraint syntax only; assignability and
    /// wire-id resolution happen at [`TapConfig::apply`] time against
    /// the real catalog.
    ///
    /// # Errors
    ///
    /// [`RuleValidationError`] naming the rule and the violation.
    pub fn validate(
        &self,
        label: &str,
    ) -> Result<(Direction, CapabilityConstraint), RuleValidationError> {
        let direction = match self.direction.as_str() {
            "incoming" => Direction::Incoming,
            "outgoing" => Direction::Outgoing,
            other => {
                return Err(RuleValidationError::UnknownDirection {
                    label: label.to_string(),
                    value: other.to_string(),
                })
            }
        };
        let constraint = self.constraint.parse().map_err(|source| {
            RuleValidationError::InvalidConstraint {
                label: label.to_string(),
                source,
            }
        })?;
        Ok((direction, constraint))
    }
}

/// Errors from applying a [`TapConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigApplyError {
    /// A definition failed validation.
    #[error(transparent)]
    Invalid(#[from] RuleValidationError),

    /// A compiled rule failed registration (wrong-direction capability,
    /// unmatched intersection, ...).
    #[error("rule '{label}': {source}")]
    Register {
        /// Rule id or generated label.
        label: String,
        /// The registration failure.
        source: RegisterError,
    },
}

impl TapConfig {
    /// Merges another config into this one.
    ///
    /// Rules accumulate across config layers. A rule in `other` whose
    /// `id` matches an existing rule replaces it (override semantics);
    /// new and anonymous rules are appended.
    pub fn merge(&mut self, other: &Self) {
        for rule in &other.rules {
            if let Some(id) = &rule.id {
                self.rules.retain(|r| r.id.as_deref() != Some(id));
            }
            self.rules.push(rule.clone());
        }
    }

    /// Validates every definition, returning all errors (not just the
    /// first).
    #[must_use]
    pub fn validate_all(&self) -> Vec<RuleValidationError> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| rule.validate(&Self::label(rule, i)).err())
            .collect()
    }

    /// Compiles the enabled rules and registers them with the
    /// interceptor.
    ///
    /// # Errors
    ///
    /// [`ConfigApplyError`] on the first invalid or unregisterable
    /// rule; rules before it stay registered.
    pub fn apply(&self, interceptor: &PacketInterceptor) -> Result<(), ConfigApplyError> {
        for (i, def) in self.rules.iter().enumerate() {
            if !def.enabled {
                continue;
            }
            let label = Self::label(def, i);
            let (direction, constraint) = def.validate(&label)?;
            let rule = Arc::new(DropRule {
                id: label.clone(),
                constraint,
            });
            let result = match direction {
                Direction::Incoming => interceptor.intercept_incoming(rule),
                Direction::Outgoing => interceptor.intercept_outgoing(rule),
            };
            if let Err(source) = result {
                return Err(ConfigApplyError::Register { label, source });
            }
        }
        Ok(())
    }

    fn label(def: &DropRuleDef, index: usize) -> String {
        def.id
            .clone()
            .unwrap_or_else(|| format!("drop-rule-{index}"))
    }
}

/// A compiled drop rule: vetoes every packet it is invoked for.
///
/// The constraint already restricts invocation to matching wire ids, so
/// the verdict is unconditionally `false`.
struct DropRule {
    id: String,
    constraint: CapabilityConstraint,
}

impl PacketHandler for DropRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn constraint(&self) -> &CapabilityConstraint {
        &self.constraint
    }
}

impl InterceptHandler for DropRule {
    fn intercept(&self, _packet: &dyn Packet, _session: &dyn Session) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: Option<&str>, direction: &str, constraint: &str) -> DropRuleDef {
        DropRuleDef {
            id: id.map(String::from),
            direction: direction.to_string(),
            constraint: constraint.to_string(),
            enabled: true,
        }
    }

    // ── Validation ───────────────────────────────────────────

    #[test]
    fn valid_rule_parses() {
        let (direction, constraint) = def(Some("r"), "incoming", "chat|move")
            .validate("r")
            .expect("valid");
        assert_eq!(direction, Direction::Incoming);
        assert_eq!(constraint.to_string(), "chat|move");
    }

    #[test]
    fn unknown_direction_rejected() {
        let err = def(Some("r"), "sideways", "chat").validate("r").expect_err("bad");
        assert_eq!(
            err,
            RuleValidationError::UnknownDirection {
                label: "r".into(),
                value: "sideways".into(),
            }
        );
    }

    #[test]
    fn bad_constraint_rejected() {
        let err = def(Some("r"), "incoming", "chat|").validate("r").expect_err("bad");
        assert!(matches!(err, RuleValidationError::InvalidConstraint { .. }));
    }

    #[test]
    fn validate_all_collects_every_error() {
        let config = TapConfig {
            rules: vec![
                def(Some("good"), "incoming", "chat"),
                def(Some("bad-dir"), "up", "chat"),
                def(None, "outgoing", "&"),
            ],
        };
        let errors = config.validate_all();
        assert_eq!(errors.len(), 2);
    }

    // ── Merge ────────────────────────────────────────────────

    #[test]
    fn merge_overrides_by_id_and_appends_rest() {
        let mut base = TapConfig {
            rules: vec![
                def(Some("shared"), "incoming", "chat"),
                def(Some("only-base"), "incoming", "move"),
            ],
        };
        let overlay = TapConfig {
            rules: vec![
                def(Some("shared"), "outgoing", "chunk"),
                def(None, "incoming", "quit"),
            ],
        };
        base.merge(&overlay);

        assert_eq!(base.rules.len(), 3);
        let shared = base
            .rules
            .iter()
            .find(|r| r.id.as_deref() == Some("shared"))
            .expect("shared rule kept");
        assert_eq!(shared.direction, "outgoing");
    }

    // ── Serde ────────────────────────────────────────────────

    #[test]
    fn toml_roundtrip_with_defaults() {
        let toml_src = r#"
            [[rules]]
            id = "no-chat"
            direction = "incoming"
            constraint = "chat|whisper"

            [[rules]]
            direction = "outgoing"
            constraint = "chunk"
            enabled = false
        "#;
        let config: TapConfig = toml::from_str(toml_src).expect("valid TOML");
        assert_eq!(config.rules.len(), 2);
        assert!(config.rules[0].enabled); // default
        assert!(!config.rules[1].enabled);
        assert_eq!(config.rules[1].id, None);
        assert!(config.validate_all().is_empty());

        let back = toml::to_string(&config).expect("serializes");
        let reparsed: TapConfig = toml::from_str(&back).expect("reparses");
        assert_eq!(reparsed, config);
    }

    #[test]
    fn empty_config_deserializes() {
        let config: TapConfig = toml::from_str("").expect("empty is valid");
        assert!(config.rules.is_empty());
    }
}
