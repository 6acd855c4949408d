pub mod health;
pub mod users;
pub mod work;
