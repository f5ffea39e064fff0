//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```
//! use nested_params::prelude::*;
//! use std::sync::Arc;
//!
//! let params = ParameterMap::from_request(Arc::new(Request::from_uri("/?a.b=1")));
//! assert_eq!(params.get_path(&["a", "b"]).unwrap().as_str(), Some("1"));
//! ```

pub use crate::{
    ExpansionReport, ParamValue, ParameterAccess, ParameterMap, ParameterSource, RawParameters,
    Request, Settings, ValueRef,
};
