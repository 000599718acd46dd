//! Catalogue entities and the identifier accessor they share.

use crate::enums::{EnvironmentKind, MitigationStatus, MitigationType, TechCategory, TechStack};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Numeric surrogate key used by most resources.
pub type NumericId = i64;

/// A business object type with its own REST resource.
///
/// Instances start empty (`Default`) for "new" flows; every field is
/// optional because the backend owns all invariants.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: Clone
        + Debug
        + Eq
        + Hash
        + Display
        + FromStr
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Singular display name, e.g. `Actor`.
    const NAME: &'static str;
    /// Plural resource segment, e.g. `actors` for `api/actors`.
    const RESOURCE: &'static str;
    /// Wire name of the identifier field, used for sorting.
    const ID_FIELD: &'static str;

    fn id(&self) -> Option<&Self::Id>;

    /// One-line label used in lists and reference pickers.
    fn label(&self) -> String;

    /// Field/value pairs for detail panels.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

fn show<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn show_ref<E: Entity>(value: Option<&E>) -> String {
    value.map(Entity::label).unwrap_or_default()
}

// ============================================================================
// ACTOR
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(rename = "actorID", skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(rename = "environMent", skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent in the actor inheritance hierarchy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<Box<Actor>>,
}

impl Entity for Actor {
    type Id = Uuid;

    const NAME: &'static str = "Actor";
    const RESOURCE: &'static str = "actors";
    const ID_FIELD: &'static str = "actorID";

    fn id(&self) -> Option<&Uuid> {
        self.actor_id.as_ref()
    }

    fn label(&self) -> String {
        match (&self.nick_name, &self.first_name, &self.last_name) {
            (Some(nick), _, _) if !nick.is_empty() => nick.clone(),
            (_, Some(first), Some(last)) => format!("{} {}", first, last),
            _ => show(&self.actor_id),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Actor ID", show(&self.actor_id)),
            ("First Name", show(&self.first_name)),
            ("Last Name", show(&self.last_name)),
            ("Nick Name", show(&self.nick_name)),
            ("Environment", show(&self.environment)),
            ("Description", show(&self.description)),
            ("Inherits From", show_ref(self.inherits_from.as_deref())),
        ]
    }
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NumericId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Environment {
    type Id = NumericId;

    const NAME: &'static str = "Environment";
    const RESOURCE: &'static str = "environments";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<&NumericId> {
        self.id.as_ref()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| show(&self.id))
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", show(&self.id)),
            ("Name", show(&self.name)),
            ("Description", show(&self.description)),
        ]
    }
}

// ============================================================================
// MITIGATION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mitigation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NumericId>,
    #[serde(rename = "controlID", skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mitigation_type: Option<MitigationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MitigationStatus>,
}

impl Entity for Mitigation {
    type Id = NumericId;

    const NAME: &'static str = "Mitigation";
    const RESOURCE: &'static str = "mitigations";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<&NumericId> {
        self.id.as_ref()
    }

    fn label(&self) -> String {
        match (&self.control_id, &self.title) {
            (Some(control), Some(title)) => format!("{} {}", control, title),
            (None, Some(title)) => title.clone(),
            _ => show(&self.id),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", show(&self.id)),
            ("Control ID", show(&self.control_id)),
            ("Title", show(&self.title)),
            ("Description", show(&self.description)),
            ("Framework Reference", show(&self.framework_reference)),
            ("Type", show(&self.mitigation_type)),
            ("Status", show(&self.status)),
        ]
    }
}

// ============================================================================
// VULNERABILITY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NumericId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Vulnerability {
    type Id = NumericId;

    const NAME: &'static str = "Vulnerability";
    const RESOURCE: &'static str = "vulnerabilities";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<&NumericId> {
        self.id.as_ref()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| show(&self.id))
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", show(&self.id)),
            ("Name", show(&self.name)),
            ("Description", show(&self.description)),
        ]
    }
}

// ============================================================================
// TECHNOLOGY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NumericId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TechCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "techStackType", skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<TechStack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_technology: Option<Box<Technology>>,
}

impl Entity for Technology {
    type Id = NumericId;

    const NAME: &'static str = "Technology";
    const RESOURCE: &'static str = "technologies";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<&NumericId> {
        self.id.as_ref()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| show(&self.id))
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", show(&self.id)),
            ("Name", show(&self.name)),
            ("Category", show(&self.category)),
            ("Description", show(&self.description)),
            ("Tech Stack", show(&self.tech_stack)),
            ("Parent", show_ref(self.parent_technology.as_deref())),
        ]
    }
}

// ============================================================================
// SCENARIO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NumericId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(rename = "qonsequence", skip_serializing_if = "Option::is_none")]
    pub consequence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_value: Option<f64>,
    #[serde(rename = "actorFK", skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde(rename = "technologyFK", skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,
    #[serde(rename = "vulnerabilityFK", skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<Vulnerability>,
}

impl Entity for Scenario {
    type Id = NumericId;

    const NAME: &'static str = "Scenario";
    const RESOURCE: &'static str = "scenarios";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<&NumericId> {
        self.id.as_ref()
    }

    fn label(&self) -> String {
        self.title.clone().unwrap_or_else(|| show(&self.id))
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", show(&self.id)),
            ("Title", show(&self.title)),
            ("Description", show(&self.description)),
            ("Probability", show(&self.probability)),
            ("Consequence", show(&self.consequence)),
            ("Risk Value", show(&self.risk_value)),
            ("Actor", show_ref(self.actor.as_ref())),
            ("Technology", show_ref(self.technology.as_ref())),
            ("Vulnerability", show_ref(self.vulnerability.as_ref())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actor_wire_names() {
        let actor_id = Uuid::parse_str("9fec3727-3421-4967-b213-ba36557ca194").unwrap();
        let actor = Actor {
            actor_id: Some(actor_id),
            first_name: Some("Kari".to_string()),
            environment: Some(EnvironmentKind::Kommune),
            ..Default::default()
        };
        let value = serde_json::to_value(&actor).unwrap();
        assert_eq!(
            value,
            json!({
                "actorID": "9fec3727-3421-4967-b213-ba36557ca194",
                "firstName": "Kari",
                "environMent": "KOM",
            })
        );
    }

    #[test]
    fn test_new_entity_serializes_without_identifier() {
        let scenario = Scenario {
            title: Some("Phishing".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&scenario).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["title"], "Phishing");
    }

    #[test]
    fn test_scenario_references_deserialize() {
        let scenario: Scenario = serde_json::from_value(json!({
            "id": 7,
            "title": "Insider leak",
            "qonsequence": 4.5,
            "riskValue": 12.0,
            "actorFK": { "actorID": "9fec3727-3421-4967-b213-ba36557ca194" },
            "technologyFK": { "id": 3, "name": "Sak" },
            "vulnerabilityFK": null
        }))
        .unwrap();
        assert_eq!(scenario.id(), Some(&7));
        assert_eq!(scenario.consequence, Some(4.5));
        assert_eq!(scenario.technology.as_ref().and_then(|t| t.id), Some(3));
        assert!(scenario.actor.is_some());
        assert!(scenario.vulnerability.is_none());
    }

    #[test]
    fn test_mitigation_type_field_name() {
        let mitigation: Mitigation = serde_json::from_value(json!({
            "id": 1,
            "controlID": "RR3",
            "type": "PREV",
            "status": "MEAS"
        }))
        .unwrap();
        assert_eq!(mitigation.mitigation_type, Some(MitigationType::Preventive));
        assert_eq!(mitigation.status, Some(MitigationStatus::Measured));
    }

    #[test]
    fn test_actor_label_prefers_nick_name() {
        let actor = Actor {
            first_name: Some("Ola".to_string()),
            last_name: Some("Nordmann".to_string()),
            ..Default::default()
        };
        assert_eq!(actor.label(), "Ola Nordmann");
        let nicked = Actor {
            nick_name: Some("ola".to_string()),
            ..actor
        };
        assert_eq!(nicked.label(), "ola");
    }

    #[test]
    fn test_technology_parent_roundtrips() {
        let tech = Technology {
            id: Some(2),
            name: Some("Portal".to_string()),
            parent_technology: Some(Box::new(Technology {
                id: Some(1),
                ..Default::default()
            })),
            ..Default::default()
        };
        let value = serde_json::to_value(&tech).unwrap();
        assert_eq!(value["parentTechnology"]["id"], 1);
        let back: Technology = serde_json::from_value(value).unwrap();
        assert_eq!(back, tech);
    }
}
