pub mod aggregate;
pub mod commission;
pub mod discount;
pub mod object_id;
pub mod order_builder;
pub mod query_builder;
pub mod settings_merge;
pub mod stats_window;
pub mod tracking;

pub use discount::calculate_discount;
pub use object_id::{parse_date, parse_object_id, parse_object_ids};
pub use query_builder::build_list_query;
pub use tracking::generate_tracking_number;
