//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod object_store;
pub mod state_publisher;
pub mod transport;

pub use object_store::ObjectStore;
pub use state_publisher::{StatePublisher, StateUpdate};
pub use transport::{Endpoint, Transport, TransportEvent};
