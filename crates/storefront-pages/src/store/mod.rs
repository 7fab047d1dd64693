//! Reducer stores
//!
//! - [`core`]: the generic [`Store`] engine
//! - [`product`], [`cart`], [`ui`]: domain states and reducers
//! - [`StoreSet`]: the three domain stores used together

pub mod action;
pub mod cart;
pub mod core;
pub mod product;
pub mod set;
pub mod ui;

pub use action::Action;
pub use cart::{CartAction, CartItem, CartReducer, CartState};
pub use self::core::{Reducer, Store, StoreError, StoreMode, Subscription};
pub use product::{ProductAction, ProductReducer, ProductSetup, ProductState};
pub use set::{StoreSet, StoreSnapshot};
pub use ui::{Toast, ToastKind, UiAction, UiReducer, UiState};
