use capstan_filter::FilterError;
use thiserror::Error;

use crate::ResourceId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Mandatory attribute \"{attribute}\" is not present in {namespace} capability")]
    MissingMandatoryAttribute { namespace: String, attribute: String },

    #[error("Invalid filter directive on {namespace} requirement: {source}")]
    InvalidFilter {
        namespace: String,
        #[source]
        source: FilterError,
    },

    #[error("Declared by resource {found}, cannot be added to resource {expected}")]
    OwnerMismatch {
        expected: ResourceId,
        found: ResourceId,
    },
}
