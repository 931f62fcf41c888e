//! Typed path parameter helpers.

use uuid::Uuid;

use routekit_core::ErrorResponse;

use crate::context::RequestContext;

/// Reads the path parameter `param` and parses it as a UUID.
///
/// Accepts every textual form `uuid` understands (hyphenated, simple, braced
/// and URN). A missing or empty parameter and an unparseable value both
/// yield a 400 whose message names the parameter.
pub fn get_path_uuid(ctx: &RequestContext, param: &str) -> Result<Uuid, ErrorResponse> {
    match ctx.param(param) {
        Some(raw) => parse_uuid(param, raw),
        None => Err(ErrorResponse::bad_request(format!(
            "missing path parameter {param:?}"
        ))),
    }
}

/// Parses `raw` as a UUID, blaming `param` on failure.
pub fn parse_uuid(param: &str, raw: &str) -> Result<Uuid, ErrorResponse> {
    Uuid::parse_str(raw).map_err(|e| {
        ErrorResponse::bad_request(format!("invalid path parameter {param:?}: {e}"))
    })
}
