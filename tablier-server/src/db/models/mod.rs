//! Document models
//!
//! One module per entity class; shared serde helpers for RecordId
//! round-tripping live in [`serde_helpers`].

pub mod serde_helpers;

mod assistance;
mod cancellation;
mod client;
mod dining_table;
mod dish;
mod employee;
mod ingredient;
mod notification;
mod order;
mod reservation;

pub use assistance::{AssistanceCreate, AssistanceRequest};
pub use cancellation::CancellationRequest;
pub use client::Client;
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use dish::{Category, CategoryCreate, Dish, DishCreate, DishUpdate, RecipeLine};
pub use employee::{Employee, EmployeeCreate, EmployeeUpdate};
pub use ingredient::{Ingredient, IngredientCreate, RestockLog, RestockRequest};
pub use notification::{Notification, NotificationRead, NotificationView};
pub use order::{
    CancelRequestBody, DrawLine, Order, OrderCreate, OrderItem, OrderItemRequest, ServerOrder,
    StockDraw,
};
pub use reservation::{Reservation, ReservationCreate};
