mod holdings;
mod order_status;
mod side;

pub use holdings::{Balance, Holdings, SubAccount};
pub use order_status::OrderStatus;
pub use side::Side;
