use crate::context::{AppContext, HealthStatus};

/// Report database reachability.
pub fn health_check(ctx: &AppContext) -> HealthStatus {
    ctx.health_check()
}
