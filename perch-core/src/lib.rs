extern crate self as perch_core;

mod codec;
mod dispatch;
mod event;
mod observable;
mod observer;
mod shared;

pub use dispatch::Dispatcher;
pub use event::{CaseIterable, EventKind};
pub use observable::Observable;
pub use observer::Observer;
pub use perch_core_macros::CaseIterable;
pub use shared::SharedObservable;
