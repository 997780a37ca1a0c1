use tracing::warn;

use crate::logging::pii::Redacted;
use crate::web::trace_ctx;

/// Failed login: unknown email or wrong password. The two are logged
/// identically apart from `reason`, which never leaves the server.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// A bearer token was refused, including one naming an unknown user.
pub fn token_rejected(reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        "Bearer token rejected"
    );
}
