pub use crate::body::{
    make_config, BodyConfig, BodyKind, ParseBodyKindError, DISTANCE_SCALAR, PLANET_SCALAR,
    SIZE_SCALAR,
};
pub use crate::registry::BodyRegistry;
