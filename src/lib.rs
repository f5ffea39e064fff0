//! Request parameter maps with dotted names exposed as nested maps.
//!
//! A flat, multi-valued parameter set such as
//! `book.title=Groovy&book.author.name=Jane&id=7` becomes a [`ParameterMap`]
//! that keeps every literal name (`book.title`) and also offers
//! `book -> author -> name` as navigable nested maps, so data binding can
//! address a subset of an object graph.

mod map;
mod errors;

pub mod prelude;

pub use map::access::ParameterAccess;
pub use map::config::{ExpansionSettings, OutputSettings, SETTING_KEYS, Settings};
pub use map::expand::{
    Collision, CollisionKind, DEFAULT_SEPARATOR, ExpansionReport, NestedKeyExpander,
};
pub use map::params::{ParameterMap, ParameterMapBuilder, parse_overlay};
pub use map::request::Request;
pub use map::source::{ParameterSource, RawParameters};
pub use map::value::{FlatValue, ParamValue, ValueRef, collapse};
pub use errors::{ConfigError, OverlayError, SettingNotFoundError, find_closest_setting};
