//! Document models for the MongoDB collections.
//!
//! These are the persisted shapes; route handlers expose separate view
//! structs so credential material and BSON internals never leak into JSON.

pub mod banner;
pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;
pub mod wishlist;

pub use banner::Banner;
pub use cart::{Cart, CartItem};
pub use order::{Order, OrderDraft, OrderItem};
pub use product::{Product, ProductAttributes};
pub use review::Review;
pub use user::{Address, OtpChallenge, OtpPurpose, User};
pub use wishlist::{Wishlist, WishlistItem};
