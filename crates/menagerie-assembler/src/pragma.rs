//! Pragmas of the primary model: diagnostic filtering and required plugins.

use log::{debug, warn};
use menagerie_core::{identifier::Id, keyword, syntax::SyntacticElement};

use crate::{
    AssemblyConfig,
    error::{AssembleError, Diagnostic, DiagnosticFilter, DiagnosticSink, ErrorCode},
};

/// Configures `sink` from the pragmas of `primary` and checks its required
/// plugins.
///
/// The filter is reset on every call. Required plugins are only checked when
/// `config` enables it; each missing plugin gets its own diagnostic.
pub(crate) fn apply(
    primary: &SyntacticElement,
    config: &AssemblyConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), AssembleError> {
    let pragmas = primary.pragmas();
    let filter = DiagnosticFilter {
        no_info: pragmas.contains_key(keyword::PRAGMA_NO_INFO),
        no_warning: pragmas.contains_key(keyword::PRAGMA_NO_WARNING),
        no_experiment: pragmas.contains_key(keyword::PRAGMA_NO_EXPERIMENT),
    };
    debug!(filter:?; "Applying pragmas");
    sink.set_filter(filter);

    if !config.enforce_required_plugins {
        return Ok(());
    }
    let Some(required) = pragmas.get(keyword::PRAGMA_REQUIRES) else {
        return Ok(());
    };

    let missing: Vec<String> = required
        .iter()
        .filter(|plugin| !config.available_plugins.contains(plugin.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    for plugin in &missing {
        warn!(plugin = plugin.as_str(); "Required plugin is not available");
        sink.emit(
            Diagnostic::error(format!("plugin `{plugin}` is required but not available"))
                .with_code(ErrorCode::E001)
                .with_label(primary.provenance().clone(), "required by this model")
                .with_help("install the plugin or remove it from the `requires` pragma"),
        );
    }
    Err(AssembleError::Pragma {
        model: Id::new(&keyword::model_name(&primary.name_or_keyword().as_string())),
        missing,
    })
}
