//! Fatal assembly failures.

use menagerie_core::{description::DescriptionError, identifier::Id};
use thiserror::Error;

/// Errors that abort assembly.
///
/// Every variant except [`AssembleError::EmptyInput`] and
/// [`AssembleError::Description`] is accompanied by at least one error
/// diagnostic in the sink.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("no syntax trees to assemble")]
    EmptyInput,

    #[error("model `{model}` requires unavailable plugins: {}", .missing.join(", "))]
    Pragma { model: Id, missing: Vec<String> },

    #[error("experiment `{0}` failed to finalize")]
    ExperimentFinalization(Id),

    #[error("model `{0}` failed to finalize")]
    ModelFinalization(Id),

    #[error("cannot graft model `{model}` as `{alias}`")]
    Graft {
        alias: Id,
        model: Id,
        #[source]
        source: DescriptionError,
    },

    #[error(transparent)]
    Description(#[from] DescriptionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragma_display_lists_plugins() {
        let err = AssembleError::Pragma {
            model: Id::new("traffic_model"),
            missing: vec!["physics".to_owned(), "traffic".to_owned()],
        };

        assert_eq!(
            err.to_string(),
            "model `traffic_model` requires unavailable plugins: physics, traffic"
        );
    }

    #[test]
    fn test_graft_keeps_source() {
        let err = AssembleError::Graft {
            alias: Id::new("sub"),
            model: Id::new("sub_model"),
            source: DescriptionError::NotFinalized(Id::new("sub_model")),
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
