use markdown_render_config::OptionsError;
use thiserror::Error;

/// Maximum nesting depth for block and inline structures. Documents deeper
/// than this are pathological; conversion aborts with no partial output.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Failures raised by the conversion engine itself.
///
/// Malformed Markdown is not an error — unmatched constructs degrade to
/// literal text. The engine only fails on input that trips an internal
/// safety bound.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RenderError {
    #[error("markdown nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Failures surfaced by the `transform` boundary: either the option layer
/// rejected the request, or the engine tripped a safety bound. Both are
/// caller-input problems; neither is retryable.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
