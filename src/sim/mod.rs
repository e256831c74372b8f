//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No host or platform dependencies

pub mod avatar;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod layout;
pub mod prop;
pub mod state;
pub mod terrain;
pub mod tick;

pub use avatar::{AnimState, Avatar};
pub use camera::Camera;
pub use clock::SessionClock;
pub use collision::{Contact, clamp_to_bounds, move_and_collide};
pub use entity::{Aabb, Body};
pub use prop::{Prop, PropKind};
pub use state::{EndReason, GameEvent, SessionTally, WorldState};
pub use terrain::Terrain;
pub use tick::{TickInput, step};
