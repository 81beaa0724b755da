/// Database layer for Okefin
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded migration runner
///
/// Models and their queries live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
