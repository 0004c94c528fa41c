pub mod locate;

pub use locate::{
    BodySource, LocateConfig, LocateService, LocateState, Resolved, locate_routes,
};
