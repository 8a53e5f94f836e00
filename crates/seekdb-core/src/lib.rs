#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod compound;
pub mod config;
pub mod directive;
pub mod error;
pub mod expr;
pub mod null;
pub mod traits;
pub mod types;

pub use compound::{CompoundQuery, SortSpec};
pub use config::{DriverKind, SearchConfig};
pub use directive::{Directive, Occur};
pub use error::{Error, Result};
pub use expr::{Hook, QueryExpr, RangeBound};
pub use null::NullDriver;
pub use traits::Driver;
pub use types::{Document, Paginated, ResultCollection, SearchHit};
