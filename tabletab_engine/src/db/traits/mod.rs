mod menu_management;
mod order_flow_database;
mod order_queries;

pub use menu_management::MenuManagement;
pub use order_flow_database::OrderFlowDatabase;
pub use order_queries::OrderQueries;
