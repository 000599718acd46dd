//! PragRisk Core - Entity Types
//!
//! Data shapes for the risk-scenario catalogue and the small pieces of
//! logic every entity screen shares: collection reconciliation, sort and
//! query parameters, and form binding.

pub mod entities;
pub mod enums;
pub mod error;
pub mod forms;
pub mod reconcile;
pub mod request;

pub use entities::{
    Actor, Entity, Environment, Mitigation, NumericId, Scenario, Technology, Vulnerability,
};
pub use enums::{
    EnumParseError, EnvironmentKind, MitigationStatus, MitigationType, TechCategory, TechStack,
};
pub use error::{FormError, ValidationError};
pub use forms::{
    ActorRelations, EditForm, FieldKind, FormBinding, FormField, ScenarioRelations,
    TechnologyRelations, CONTROL_ID_PATTERN, DESCRIPTION_MAX_LENGTH,
};
pub use reconcile::{add_if_missing, add_to_collection_if_missing};
pub use request::{
    sort_params, unclaimed_parent_filter, Page, Pagination, RequestOptions, SortState,
    ITEMS_PER_PAGE, TOTAL_COUNT_HEADER,
};
