//! Map service to feature service draft conversion

use crate::draft::ServiceDraft;

/// Manifest type that makes staging overwrite an existing service
pub const REPLACEMENT_SERVICE_TYPE: &str = "esriServiceDefinitionType_Replacement";

/// Manifest state of a published service definition
pub const PUBLISHED_STATE: &str = "esriSDState_Published";

/// Service type name produced by the map draft generator
pub const MAP_SERVER: &str = "MapServer";

/// Service type name of a hosted feature service
pub const FEATURE_SERVER: &str = "FeatureServer";

/// What a conversion changed in the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct RewriteSummary {
    /// Number of `SVCManifest/Type` fields set
    pub service_type_fields: usize,
    /// Number of `SVCManifest/State` fields set
    pub state_fields: usize,
    /// Number of `TypeName` fields changed from map to feature server
    pub retyped: usize,
}

/// Convert a map service draft into a feature service draft that replaces
/// the existing service
#[inline]
pub fn to_feature_service(draft: &mut ServiceDraft) -> RewriteSummary {
    RewriteSummary {
        service_type_fields: draft.set_service_type(REPLACEMENT_SERVICE_TYPE),
        state_fields: draft.set_state(PUBLISHED_STATE),
        retyped: draft.retype(MAP_SERVER, FEATURE_SERVER),
    }
}
