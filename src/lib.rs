//! Ordered multi-valued maps.
//!
//! A multimap holds key and value pairs in insertion order, where a key may appear more than
//! once. This crate provides four variants:
//!
//! - [`MultiMap`], read-only
//! - [`MutableMultiMap`], mutable
//! - [`CiMultiMap`], read-only with case-insensitive string keys
//! - [`CiMutableMultiMap`], mutable with case-insensitive string keys
//!
//! Case-insensitive maps store every key as [`CiStr`], the folded form of the input.
//!
//! # Features
//!
//! - `log`, emit diagnostics through the [`log`](https://docs.rs/log) crate
//! - `serde`, `Serialize` and `Deserialize` for every map and [`CiStr`]
#![warn(missing_debug_implementations)]

mod log;

mod error;
mod storage;
mod fold;
mod iter;
mod view;

mod map;
mod ci;
mod mutable;
mod mapping;

#[cfg(feature = "serde")]
mod serialize;

pub use error::{MultiMapError, Unsupported};
pub use fold::{AsFoldedKey, CiStr, IntoFoldedKey};
pub use storage::GetAll;
pub use iter::{Iter, Keys};
pub use view::{ItemsView, KeysView, ValuesView};
pub use map::MultiMap;
pub use ci::CiMultiMap;
pub use mutable::{CiMutableMultiMap, MutableMultiMap};
pub use mapping::Mapping;
