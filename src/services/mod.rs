// Service exports
pub mod mysql;
pub mod subscription;

pub use mysql::{DatabaseError, MySqlClient};
pub use subscription::{PlanCatalog, SubscriptionService};
