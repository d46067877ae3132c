pub mod carts;
pub mod clothes;
pub mod users;

pub use carts::Entity as Carts;
pub use clothes::Entity as Clothes;
pub use users::Entity as Users;
