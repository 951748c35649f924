use mysql_async::{OptsBuilder, Pool, PoolConstraints, PoolOpts};

use crate::config::HandleConfig;

/// Pool for a `MySQL` handle.
///
/// Connections are opened lazily; `max_idle_conns` is the floor kept open and
/// `max_open_conns` the ceiling. Every new connection runs the handle's
/// `SET NAMES … COLLATE …` first.
#[must_use]
pub fn build_pool(config: &HandleConfig) -> Pool {
    let max = usize::try_from(config.max_open_conns.max(1)).unwrap_or(1);
    let min = usize::try_from(config.max_idle_conns)
        .unwrap_or(0)
        .min(max);
    let constraints = PoolConstraints::new(min, max).unwrap_or_default();

    let opts = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.username.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()))
        .init(vec![config.mysql_init_statement()])
        .pool_opts(PoolOpts::default().with_constraints(constraints));

    Pool::new(opts)
}
