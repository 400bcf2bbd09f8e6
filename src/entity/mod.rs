pub mod buy_history_products;
pub mod buy_histories;
pub mod cart_products;
pub mod carts;
pub mod comments;
pub mod products;
pub mod reactions;
pub mod users;

pub use buy_history_products::Entity as BuyHistoryProducts;
pub use buy_histories::Entity as BuyHistories;
pub use cart_products::Entity as CartProducts;
pub use carts::Entity as Carts;
pub use comments::Entity as Comments;
pub use products::Entity as Products;
pub use reactions::Entity as Reactions;
pub use users::Entity as Users;
