pub mod cache;
pub mod compose;
pub mod constraints;
pub mod errors;
pub mod events;
pub mod expression;
pub mod matcher;
mod method;
pub mod path;
mod route;
mod router;
pub mod segment;

pub use cache::SharedCaches;
pub use compose::{ComposeOp, PortableComposer};
pub use constraints::{ConstraintFailure, ConstraintRule, ConstraintSpec};
pub use errors::{RouterError, RouterResult};
pub use events::{
    Notifier, RouteActivation, RouteListener, RouterEvent, RouterListener, SubscriberId,
};
pub use expression::{ExpressionError, parse_expression};
pub use matcher::{Bindings, BoundValue, match_path};
pub use method::{Method, MethodSet};
pub use path::{base_join, parse_pathname};
pub use route::{Route, RouteOptions, RouteOptionsBuilder};
pub use router::{DispatchOptions, RouteInput, RouteSelector, Router};
pub use segment::{ParsedPath, RouteSegment, TrailingSlash};
